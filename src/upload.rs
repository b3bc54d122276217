/*!
 * Upload orchestration: permission, lock and form gates around the Merge
 * Engine.
 *
 * Each gate may short-circuit to a terminal redirect carrying one queued
 * message. The only exception is the permission check, whose failure aborts
 * the whole request as `Forbidden` instead of redirecting.
 */

use anyhow::{Result, anyhow};
use bytes::Bytes;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::access::{Capability, Caller, derive_author, derive_flag};
use crate::collab::MergeEngine;
use crate::corpus::{Corpus, ResourceKey};
use crate::errors::{FieldError, FlowError};
use crate::report::{Reporter, Response, Severity, UserMessage};
use crate::resolver;

// Lenient shape check; real address validation is the mail system's problem
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// How the Merge Engine reconciles uploaded strings
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    // @method: Update translations only
    #[default]
    Translate,
    // @method: Add as suggestions needing review
    Suggest,
    // @method: Add and immediately approve
    Approve,
    // @method: Replace the existing file wholesale
    Replace,
    // @method: Import everything as fuzzy
    Fuzzy,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Translate => "translate",
            Self::Suggest => "suggest",
            Self::Approve => "approve",
            Self::Replace => "replace",
            Self::Fuzzy => "fuzzy",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for MergeMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "translate" => Ok(Self::Translate),
            "suggest" => Ok(Self::Suggest),
            "approve" => Ok(Self::Approve),
            "replace" => Ok(Self::Replace),
            "fuzzy" => Ok(Self::Fuzzy),
            _ => Err(anyhow!("invalid merge method: {}", s)),
        }
    }
}

/// Raw submitted form fields, one per HTTP call; never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadForm {
    /// Raw uploaded file content, held fully in memory for the request
    pub file: Bytes,

    /// Requested merge method, parsed during validation
    pub method: String,

    /// Mark imported strings as needing review
    #[serde(default)]
    pub fuzzy: bool,

    /// Overwrite existing translations; gated by capability
    #[serde(default)]
    pub upload_overwrite: bool,

    /// Claimed author name; gated by capability
    #[serde(default)]
    pub author_name: String,

    /// Claimed author email; gated by capability
    #[serde(default)]
    pub author_email: String,
}

impl UploadForm {
    /// Check the submitted parameters against the Merge Engine's declared
    /// parameter contract, collecting every field-level error
    pub fn validate(&self) -> Result<MergeMethod, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.file.is_empty() {
            errors.push(FieldError::new("file", "an uploaded file is required"));
        }

        let method = match self.method.parse::<MergeMethod>() {
            Ok(method) => Some(method),
            Err(err) => {
                errors.push(FieldError::new("method", &err.to_string()));
                None
            }
        };

        if !self.author_email.is_empty() && !EMAIL_RE.is_match(&self.author_email) {
            errors.push(FieldError::new(
                "author_email",
                "enter a valid email address",
            ));
        }

        match (method, errors.is_empty()) {
            (Some(method), true) => Ok(method),
            _ => Err(errors),
        }
    }
}

/// Effective merge parameters after capability derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeParams {
    pub overwrite: bool,
    pub author_name: String,
    pub author_email: String,
    pub method: MergeMethod,
    pub fuzzy: bool,
}

/// Drives one upload request through its gates to a terminal redirect
#[derive(Debug, Clone)]
pub struct UploadOrchestrator {
    engine: Arc<dyn MergeEngine>,
    reporter: Reporter,
}

impl UploadOrchestrator {
    pub fn new(engine: Arc<dyn MergeEngine>, reporter: Reporter) -> Self {
        Self { engine, reporter }
    }

    /// Handle one upload against the target resource.
    ///
    /// Every path ends in a redirect back to the resource's canonical view
    /// carrying exactly one queued message; `Forbidden` and `NotFound` are
    /// the only failures that propagate instead.
    pub async fn handle_upload(
        &self,
        corpus: &Corpus,
        caller: &Caller,
        key: &ResourceKey,
        form: UploadForm,
    ) -> Result<Response, FlowError> {
        match self.run_gates(corpus, caller, key, form).await {
            Ok(message) => Ok(Response::new(key.canonical_url(), message)),
            Err(FlowError::LockedResource) => Ok(Response::new(
                key.canonical_url(),
                UserMessage::new(Severity::Error, "Access denied."),
            )),
            Err(FlowError::Validation(errors)) => Ok(Response::new(
                key.canonical_url(),
                self.reporter.form_errors(&errors),
            )),
            Err(err) => Err(err),
        }
    }

    /// The gate sequence proper; soft failures surface as typed errors and
    /// are converted to redirects by `handle_upload`
    async fn run_gates(
        &self,
        corpus: &Corpus,
        caller: &Caller,
        key: &ResourceKey,
        form: UploadForm,
    ) -> Result<UserMessage, FlowError> {
        let resource = resolver::resolve_resource(corpus, caller, key)?;

        if !caller.has(Capability::UploadPerform) {
            return Err(FlowError::Forbidden(format!(
                "{} may not upload to {key}",
                caller.username
            )));
        }

        let component = corpus
            .component(&key.component_key())
            .ok_or_else(|| FlowError::NotFound(format!("component '{}'", key.component_key())))?;

        if component.locked {
            warn!("upload to locked component {} rejected", component.key());
            return Err(FlowError::LockedResource);
        }

        let method = form.validate().map_err(|errors| {
            debug!("upload form invalid: {} error(s)", errors.len());
            FlowError::Validation(errors)
        })?;

        let (author_name, author_email) = derive_author(
            &form.author_name,
            &form.author_email,
            caller.has(Capability::UploadAuthorship),
        );
        let overwrite = derive_flag(
            form.upload_overwrite,
            caller.has(Capability::UploadOverwrite),
        );

        let params = MergeParams {
            overwrite,
            author_name,
            author_email,
            method,
            fuzzy: form.fuzzy,
        };
        info!(
            "merging {} byte(s) into {key} (method={}, overwrite={}, fuzzy={})",
            form.file.len(),
            params.method,
            params.overwrite,
            params.fuzzy
        );

        let result = self.engine.merge(&resource, form.file, &params).await;
        Ok(self.reporter.classify(result, &component.full_path))
    }
}
