/*!
 * Error types for the locflow orchestration core.
 *
 * This module contains custom error types for the different stages of the
 * upload and export flows, using the thiserror crate for ergonomic error
 * definitions.
 */

use thiserror::Error;

/// A single field-level validation failure from a submitted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending form field
    pub field: String,

    /// Human-readable description of the problem
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors raised by the Merge Engine while reconciling an uploaded file
#[derive(Error, Debug)]
pub enum MergeError {
    /// The uploaded file's plural rule count disagrees with the target language
    #[error("plural forms in the uploaded file do not match current translation ({file_forms} vs {expected_forms})")]
    PluralFormsMismatch {
        /// Plural form count declared by the uploaded file
        file_forms: usize,
        /// Plural form count expected by the target language
        expected_forms: usize,
    },

    /// The uploaded file could not be parsed
    #[error("failed to parse uploaded file: {0}")]
    Parse(String),

    /// I/O failure while the engine was applying strings
    #[error("merge I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other engine failure
    #[error("{0}")]
    Other(String),
}

/// Errors that abort an upload or export request
#[derive(Error, Debug)]
pub enum FlowError {
    /// A scope descriptor named a nonexistent entity
    #[error("{0} not found")]
    NotFound(String),

    /// The caller lacks a required capability; aborts the whole request
    #[error("access forbidden: {0}")]
    Forbidden(String),

    /// The owning component is locked against uploads
    #[error("component is locked")]
    LockedResource,

    /// The submitted form failed field-level validation
    #[error("form validation failed")]
    Validation(Vec<FieldError>),

    /// The requested export format is not supported by the converter
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// The backing store failed to commit pending edits
    #[error("store error: {0}")]
    Store(String),

    /// The archive builder failed
    #[error("archive error: {0}")]
    Archive(String),
}

impl FlowError {
    /// True when the error should surface as a client error rather than a
    /// server-side failure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Forbidden(_)
                | Self::Validation(_)
                | Self::UnsupportedFormat(_)
        )
    }
}
