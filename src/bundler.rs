/*!
 * Export bundling: resource sets to a single downloadable archive.
 */

use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::collab::{ArchiveBuilder, ArchiveStream, FormatConverter};
use crate::corpus::TranslationResource;
use crate::errors::FlowError;

/// Assembles one archive from the backing files of a resource set
#[derive(Debug, Clone)]
pub struct Bundler {
    archive: Arc<dyn ArchiveBuilder>,
    converter: Arc<dyn FormatConverter>,
    /// Root directory the backing file paths are relative to
    root: PathBuf,
}

impl Bundler {
    pub fn new(
        archive: Arc<dyn ArchiveBuilder>,
        converter: Arc<dyn FormatConverter>,
        root: PathBuf,
    ) -> Self {
        Self {
            archive,
            converter,
            root,
        }
    }

    /// Bundle the backing files of `resources` into one archive.
    ///
    /// Resources without a backing file are silently dropped; a project may
    /// legitimately contain resources not yet materialized. An empty
    /// surviving set yields a valid empty archive. With `format` given, each
    /// file is reformatted before inclusion; an unknown format fails with
    /// `UnsupportedFormat`.
    pub async fn bundle(
        &self,
        resources: &[TranslationResource],
        format: Option<&str>,
    ) -> Result<ArchiveStream, FlowError> {
        let mut files: Vec<PathBuf> = Vec::with_capacity(resources.len());
        for resource in resources {
            match &resource.filename {
                Some(filename) => files.push(filename.clone()),
                None => debug!("skipping {} (no backing file)", resource.key),
            }
        }

        if let Some(format) = format {
            if !self.converter.supports(format) {
                warn!("rejected export with unknown format '{format}'");
                return Err(FlowError::UnsupportedFormat(format.to_string()));
            }
            files = files
                .iter()
                .map(|f| self.converter.convert(f, format))
                .collect::<Result<Vec<_>, _>>()?;
        }

        debug!("bundling {} file(s) under {:?}", files.len(), self.root);
        self.archive
            .bundle(&self.root, &files)
            .await
            .map_err(|e| FlowError::Archive(e.to_string()))
    }
}
