/*!
 * Export orchestration: resolve, commit pending state, bundle.
 *
 * Scope exports (component list, project, project+language, component)
 * produce one archive; the single-resource download returns the file itself,
 * optionally filtered by a unit query and reformatted on the fly.
 */

use anyhow::Context;
use bytes::Bytes;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::access::Caller;
use crate::barrier::ConsistencyBarrier;
use crate::bundler::Bundler;
use crate::collab::{ArchiveBuilder, ArchiveStream, FormatConverter, Store};
use crate::corpus::{Corpus, ResourceKey};
use crate::errors::{FieldError, FlowError};
use crate::resolver::{self, Scope};

/// Download query parameters; absence of both means "export exactly as
/// stored"
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadSpec {
    /// Target file format identifier
    #[serde(default)]
    pub format: Option<String>,

    /// Free-text unit filter
    #[serde(default)]
    pub q: Option<String>,
}

impl DownloadSpec {
    pub fn is_empty(&self) -> bool {
        self.format.is_none() && self.q.is_none()
    }

    /// Field-level validation of the query parameters
    fn validate(&self, converter: &dyn FormatConverter) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Some(format) = &self.format {
            if !converter.supports(format) {
                errors.push(FieldError::new("format", "unsupported file format"));
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// A single exported file
#[derive(Debug, Clone)]
pub struct FileDownload {
    pub name: String,
    pub content: Bytes,
}

/// Coordinates the barrier and the bundler over a resolved scope
#[derive(Debug, Clone)]
pub struct Exporter {
    barrier: ConsistencyBarrier,
    bundler: Bundler,
    converter: Arc<dyn FormatConverter>,
}

impl Exporter {
    pub fn new(
        store: Arc<dyn Store>,
        archive: Arc<dyn ArchiveBuilder>,
        converter: Arc<dyn FormatConverter>,
        root: PathBuf,
    ) -> Self {
        Self {
            barrier: ConsistencyBarrier::new(store),
            bundler: Bundler::new(archive, converter.clone(), root),
            converter,
        }
    }

    /// Export every resource in scope as one archive.
    ///
    /// The consistency barrier runs over each distinct component in scope
    /// before any filename is read, so the archive reflects the latest
    /// committed state as of the start of this call.
    pub async fn export_scope(
        &self,
        corpus: &Corpus,
        caller: &Caller,
        scope: &Scope,
        format: Option<&str>,
    ) -> Result<ArchiveStream, FlowError> {
        let set = resolver::resolve_scope(corpus, caller, scope)?;
        self.barrier.flush(&set.components, "download").await?;
        let archive = self.bundler.bundle(&set.resources, format).await?;
        info!(
            "exported {} file(s) for {} component(s)",
            archive.file_count,
            set.components.len()
        );
        Ok(archive)
    }

    /// Download one resource's file, optionally filtered and reformatted.
    ///
    /// With neither `format` nor `q` given the backing file is returned
    /// exactly as stored. With a filter, the matching unit set is
    /// de-duplicated and rendered by the converter. Invalid query parameters
    /// fail with field-level `Validation` errors; a resource without a
    /// backing file and no filter fails with `NotFound`.
    pub async fn download_resource(
        &self,
        corpus: &Corpus,
        caller: &Caller,
        key: &ResourceKey,
        spec: &DownloadSpec,
    ) -> Result<FileDownload, FlowError> {
        let resource = resolver::resolve_resource(corpus, caller, key)?;
        self.barrier
            .flush(&[key.component_key()], "download")
            .await?;

        if spec.is_empty() {
            let filename = resource
                .filename
                .as_ref()
                .ok_or_else(|| FlowError::NotFound(format!("file for '{key}'")))?;
            let content = tokio::fs::read(filename)
                .await
                .with_context(|| format!("failed to read {filename:?}"))
                .map_err(|e| FlowError::Store(e.to_string()))?;
            let name = filename
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| key.to_string());
            return Ok(FileDownload {
                name,
                content: Bytes::from(content),
            });
        }

        spec.validate(self.converter.as_ref())
            .map_err(FlowError::Validation)?;

        let units = resource.search_units(spec.q.as_deref().unwrap_or(""));
        debug!("filtered download of {key}: {} unit(s)", units.len());
        let content = self
            .converter
            .render_units(&resource, &units, spec.format.as_deref())?;
        let extension = spec.format.clone().unwrap_or_else(|| "po".to_string());
        Ok(FileDownload {
            name: format!("{}-{}-{}.{extension}", key.project, key.component, key.language),
            content,
        })
    }
}
