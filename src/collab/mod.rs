/*!
 * Contracts for the external collaborators of the orchestration core.
 *
 * This module defines the interfaces the core depends on:
 * - `MergeEngine`: parses an uploaded file and reconciles its strings
 * - `Store`: version-controlled backing store with a commit-pending barrier
 * - `ArchiveBuilder`: turns a file set into one downloadable archive
 * - `FormatConverter`: on-the-fly reformatting for exports
 * - `ErrorSink`: operator-facing error tracking
 *
 * The implementations live outside this crate; `mock` provides configurable
 * in-crate fakes for tests.
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::corpus::{ComponentKey, TranslationResource, Unit};
use crate::errors::{FlowError, MergeError};
use crate::upload::MergeParams;

pub mod mock;

/// Per-upload outcome counts reported by the Merge Engine.
///
/// Expected to satisfy `accepted + skipped + not_found <= total`; the core
/// does not enforce this, see `Reporter`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Strings in the file with no matching source string
    pub not_found: u64,
    /// Strings deliberately not applied
    pub skipped: u64,
    /// Strings successfully applied
    pub accepted: u64,
    /// Strings considered
    pub total: u64,
}

/// A single streamable archive produced by the ArchiveBuilder
#[derive(Debug, Clone)]
pub struct ArchiveStream {
    /// Download filename of the archive
    pub name: String,
    /// Archive bytes
    pub content: Bytes,
    /// Number of files included
    pub file_count: usize,
}

/// External engine that reconciles an uploaded file's strings into a resource
///
/// This trait defines the interface the upload orchestrator drives, allowing
/// engine implementations to be swapped out in tests.
#[async_trait]
pub trait MergeEngine: Send + Sync + Debug {
    /// Merge the uploaded bytes into the target resource
    ///
    /// # Arguments
    /// * `resource` - The target translation resource
    /// * `file` - Raw uploaded file content, held fully in memory
    /// * `params` - Effective merge parameters after capability derivation
    ///
    /// # Returns
    /// * `Result<MergeOutcome, MergeError>` - The four outcome counts or an engine failure
    async fn merge(
        &self,
        resource: &TranslationResource,
        file: Bytes,
        params: &MergeParams,
    ) -> Result<MergeOutcome, MergeError>;
}

/// Version-controlled backing store
#[async_trait]
pub trait Store: Send + Sync + Debug {
    /// Synchronously flush any pending in-memory edits of the component to
    /// the backing store. Idempotent: with nothing pending this is a no-op.
    async fn commit_pending(
        &self,
        component: &ComponentKey,
        reason: &str,
        author: Option<&str>,
    ) -> anyhow::Result<()>;
}

/// External archive-writing utility
#[async_trait]
pub trait ArchiveBuilder: Send + Sync + Debug {
    /// Produce one archive from the given files under `root`. An empty file
    /// list must yield a valid empty archive.
    async fn bundle(&self, root: &Path, files: &[PathBuf]) -> anyhow::Result<ArchiveStream>;
}

/// External file-format converter for on-the-fly export reformatting
pub trait FormatConverter: Send + Sync + Debug {
    /// Whether the target format identifier is known to the converter
    fn supports(&self, format: &str) -> bool;

    /// Reformat one backing file to the target format, returning the path of
    /// the converted file
    fn convert(&self, path: &Path, format: &str) -> Result<PathBuf, FlowError>;

    /// Render a (possibly filtered) unit set of a resource, in the target
    /// format when given, otherwise in the resource's stored format
    fn render_units(
        &self,
        resource: &TranslationResource,
        units: &[Unit],
        format: Option<&str>,
    ) -> Result<Bytes, FlowError>;
}

/// Operator-facing error tracking collaborator
///
/// Injected into the Reporter rather than accessed as a process-wide
/// singleton, so tests can substitute a capturing fake.
pub trait ErrorSink: Send + Sync + Debug {
    /// Record a failure for operator visibility
    fn report(&self, cause: &str, detail: &str);
}
