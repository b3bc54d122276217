/*!
 * Mock collaborator implementations for testing.
 *
 * This module provides configurable fakes for every collaborator contract:
 * - `MockEngine::working(outcome)` - Always succeeds with the given counts
 * - `MockEngine::plural_mismatch(..)` - Always fails with PluralFormsMismatch
 * - `MockEngine::failing(..)` - Always fails with a generic engine error
 * - `MockStore` - Records commit calls, flushing corpus pending flags
 * - `MockArchiveBuilder` - Builds a plain-text listing of the bundled files
 * - `MockConverter` - Rewrites file extensions for a fixed format set
 * - `CapturingSink` - Captures reported errors for assertions
 */

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::collab::{ArchiveBuilder, ArchiveStream, ErrorSink, FormatConverter, MergeEngine, MergeOutcome, Store};
use crate::corpus::{ComponentKey, Corpus, TranslationResource, Unit};
use crate::errors::{FlowError, MergeError};
use crate::upload::MergeParams;

/// Behavior mode for the mock merge engine
#[derive(Debug, Clone)]
pub enum EngineBehavior {
    /// Always succeeds with the given outcome counts
    Working(MergeOutcome),
    /// Always fails with a plural-forms mismatch
    PluralMismatch { file_forms: usize, expected_forms: usize },
    /// Always fails with a generic engine error
    Failing(String),
}

/// One recorded engine invocation
#[derive(Debug, Clone)]
pub struct RecordedMerge {
    pub resource: String,
    pub file_len: usize,
    pub params: MergeParams,
}

/// Mock merge engine recording every invocation
#[derive(Debug)]
pub struct MockEngine {
    behavior: EngineBehavior,
    calls: Mutex<Vec<RecordedMerge>>,
}

impl MockEngine {
    pub fn new(behavior: EngineBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Engine that always succeeds with the given counts
    pub fn working(outcome: MergeOutcome) -> Arc<Self> {
        Self::new(EngineBehavior::Working(outcome))
    }

    /// Engine that always raises a plural-forms mismatch
    pub fn plural_mismatch(file_forms: usize, expected_forms: usize) -> Arc<Self> {
        Self::new(EngineBehavior::PluralMismatch {
            file_forms,
            expected_forms,
        })
    }

    /// Engine that always fails with the given message
    pub fn failing(message: &str) -> Arc<Self> {
        Self::new(EngineBehavior::Failing(message.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_call(&self) -> Option<RecordedMerge> {
        self.calls.lock().last().cloned()
    }
}

#[async_trait]
impl MergeEngine for MockEngine {
    async fn merge(
        &self,
        resource: &TranslationResource,
        file: Bytes,
        params: &MergeParams,
    ) -> Result<MergeOutcome, MergeError> {
        self.calls.lock().push(RecordedMerge {
            resource: resource.key.to_string(),
            file_len: file.len(),
            params: params.clone(),
        });
        match &self.behavior {
            EngineBehavior::Working(outcome) => Ok(*outcome),
            EngineBehavior::PluralMismatch {
                file_forms,
                expected_forms,
            } => Err(MergeError::PluralFormsMismatch {
                file_forms: *file_forms,
                expected_forms: *expected_forms,
            }),
            EngineBehavior::Failing(message) => Err(MergeError::Other(message.clone())),
        }
    }
}

/// One recorded commit-pending call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommit {
    pub component: ComponentKey,
    pub reason: String,
    /// Whether the call actually flushed anything
    pub flushed: bool,
}

/// Mock store backed by the corpus pending flags
#[derive(Debug)]
pub struct MockStore {
    corpus: Arc<Corpus>,
    commits: Mutex<Vec<RecordedCommit>>,
}

impl MockStore {
    pub fn new(corpus: Arc<Corpus>) -> Arc<Self> {
        Arc::new(Self {
            corpus,
            commits: Mutex::new(Vec::new()),
        })
    }

    pub fn commits(&self) -> Vec<RecordedCommit> {
        self.commits.lock().clone()
    }

    /// Number of calls that flushed actual pending state
    pub fn flush_count(&self) -> usize {
        self.commits.lock().iter().filter(|c| c.flushed).count()
    }
}

#[async_trait]
impl Store for MockStore {
    async fn commit_pending(
        &self,
        component: &ComponentKey,
        reason: &str,
        _author: Option<&str>,
    ) -> anyhow::Result<()> {
        let flushed = self.corpus.take_pending(component);
        self.commits.lock().push(RecordedCommit {
            component: component.clone(),
            reason: reason.to_string(),
            flushed,
        });
        Ok(())
    }
}

/// Mock archive builder producing a newline-separated listing of included
/// file names as the archive body
#[derive(Debug, Default)]
pub struct MockArchiveBuilder;

impl MockArchiveBuilder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl ArchiveBuilder for MockArchiveBuilder {
    async fn bundle(&self, _root: &Path, files: &[PathBuf]) -> anyhow::Result<ArchiveStream> {
        let listing = files
            .iter()
            .map(|f| f.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ArchiveStream {
            name: "translations.zip".to_string(),
            content: Bytes::from(listing),
            file_count: files.len(),
        })
    }
}

/// Mock converter supporting a fixed set of format identifiers
#[derive(Debug)]
pub struct MockConverter {
    formats: Vec<String>,
}

impl MockConverter {
    /// Converter that knows the usual localization formats
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            formats: vec!["po".to_string(), "csv".to_string(), "json".to_string()],
        })
    }
}

impl FormatConverter for MockConverter {
    fn supports(&self, format: &str) -> bool {
        self.formats.iter().any(|f| f == format)
    }

    fn convert(&self, path: &Path, format: &str) -> Result<PathBuf, FlowError> {
        if !self.supports(format) {
            return Err(FlowError::UnsupportedFormat(format.to_string()));
        }
        Ok(path.with_extension(format))
    }

    fn render_units(
        &self,
        resource: &TranslationResource,
        units: &[Unit],
        format: Option<&str>,
    ) -> Result<Bytes, FlowError> {
        if let Some(format) = format {
            if !self.supports(format) {
                return Err(FlowError::UnsupportedFormat(format.to_string()));
            }
        }
        let mut body = format!("# {}\n", resource.key);
        for unit in units {
            body.push_str(&format!("{}={}\n", unit.source, unit.target));
        }
        Ok(Bytes::from(body))
    }
}

/// Error sink capturing every report for test assertions
#[derive(Debug, Default)]
pub struct CapturingSink {
    reports: Mutex<Vec<(String, String)>>,
}

impl CapturingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().clone()
    }
}

impl ErrorSink for CapturingSink {
    fn report(&self, cause: &str, detail: &str) {
        self.reports.lock().push((cause.to_string(), detail.to_string()));
    }
}
