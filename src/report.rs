/*!
 * Outcome reporting: merge results and failures to user-facing messages.
 *
 * The message category is a pure function of `(total, accepted)` for
 * successful merges; failures are categorized into the fixed plural-mismatch
 * message or a redacted catch-all that is also forwarded to the operator
 * error sink.
 */

use log::{error, warn};
use std::path::Path;
use std::sync::Arc;

use crate::collab::{ErrorSink, MergeOutcome};
use crate::errors::{FieldError, MergeError};

/// Severity of a queued user message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// One user-visible message queued on the redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub severity: Severity,
    pub text: String,
}

impl UserMessage {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

/// Terminal state of a request: a redirect back to the canonical resource
/// view carrying exactly one queued message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub redirect: String,
    pub message: UserMessage,
}

impl Response {
    pub fn new(redirect: impl Into<String>, message: UserMessage) -> Self {
        Self {
            redirect: redirect.into(),
            message,
        }
    }
}

/// Strip a local storage path fragment out of an error message so filesystem
/// layout never leaks to the user
pub fn redact_path(message: &str, path_fragment: &str) -> String {
    if path_fragment.is_empty() {
        return message.to_string();
    }
    message.replace(path_fragment, "")
}

/// Singular/plural template selection on a count
fn ngettext<'a>(singular: &'a str, plural: &'a str, count: u64) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// Converts merge results into localized, severity-tagged user messages
#[derive(Debug, Clone)]
pub struct Reporter {
    sink: Arc<dyn ErrorSink>,
}

impl Reporter {
    pub fn new(sink: Arc<dyn ErrorSink>) -> Self {
        Self { sink }
    }

    /// Classify a finished merge into exactly one user message
    pub fn classify(
        &self,
        result: Result<MergeOutcome, MergeError>,
        component_path: &Path,
    ) -> UserMessage {
        match result {
            Ok(outcome) => self.report_outcome(&outcome),
            Err(MergeError::PluralFormsMismatch { .. }) => UserMessage::new(
                Severity::Error,
                "Plural forms in the uploaded file do not match current translation.",
            ),
            Err(err) => self.report_failure(&err, component_path),
        }
    }

    fn report_outcome(&self, outcome: &MergeOutcome) -> UserMessage {
        if outcome.accepted + outcome.skipped + outcome.not_found > outcome.total {
            // Soft invariant: the engine is expected to keep these counts
            // mutually exclusive relative to total
            warn!(
                "merge outcome counts exceed total: {}+{}+{} > {}",
                outcome.accepted, outcome.skipped, outcome.not_found, outcome.total
            );
        }

        if outcome.total == 0 {
            return UserMessage::new(
                Severity::Info,
                "No strings were imported from the uploaded file.",
            );
        }

        let template = ngettext(
            "Processed {0} string from the uploaded files (skipped: {1}, not found: {2}, updated: {3}).",
            "Processed {0} strings from the uploaded files (skipped: {1}, not found: {2}, updated: {3}).",
            outcome.total,
        );
        let text = template
            .replace("{0}", &outcome.total.to_string())
            .replace("{1}", &outcome.skipped.to_string())
            .replace("{2}", &outcome.not_found.to_string())
            .replace("{3}", &outcome.accepted.to_string());

        if outcome.accepted == 0 {
            UserMessage::new(Severity::Warning, text)
        } else {
            UserMessage::new(Severity::Success, text)
        }
    }

    /// Catch-all engine failure: redact the component storage path from the
    /// user-visible text and record the failure for operators
    fn report_failure(&self, err: &MergeError, component_path: &Path) -> UserMessage {
        let detail = err.to_string();
        error!("upload failed: {detail}");
        self.sink.report("Upload error", &detail);
        let cleaned = redact_path(&detail, &component_path.display().to_string());
        UserMessage::new(Severity::Error, format!("File upload has failed: {cleaned}"))
    }

    /// Enumerate every field-level validation error into one message
    pub fn form_errors(&self, errors: &[FieldError]) -> UserMessage {
        let details = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        UserMessage::new(
            Severity::Error,
            format!("Please fix errors in the form. {details}"),
        )
    }
}
