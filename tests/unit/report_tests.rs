/*!
 * Tests for outcome classification and message rendering
 */

use std::path::Path;

use locflow::collab::mock::CapturingSink;
use locflow::report::redact_path;
use locflow::{MergeError, MergeOutcome, Reporter, Severity};

fn reporter() -> (Reporter, std::sync::Arc<CapturingSink>) {
    let sink = CapturingSink::new();
    (Reporter::new(sink.clone()), sink)
}

fn outcome(not_found: u64, skipped: u64, accepted: u64, total: u64) -> MergeOutcome {
    MergeOutcome {
        not_found,
        skipped,
        accepted,
        total,
    }
}

/// Test that a zero-total merge produces the informational message
#[test]
fn test_classify_withZeroTotal_shouldReturnInfo() {
    let (reporter, sink) = reporter();
    let message = reporter.classify(Ok(outcome(0, 0, 0, 0)), Path::new("/srv/c"));

    assert_eq!(message.severity, Severity::Info);
    assert_eq!(
        message.text,
        "No strings were imported from the uploaded file."
    );
    assert!(sink.reports().is_empty());
}

/// Test that zero accepted strings produce a warning with interpolated counts
#[test]
fn test_classify_withNothingAccepted_shouldReturnWarningWithCounts() {
    let (reporter, _) = reporter();
    let message = reporter.classify(Ok(outcome(3, 2, 0, 5)), Path::new("/srv/c"));

    assert_eq!(message.severity, Severity::Warning);
    assert_eq!(
        message.text,
        "Processed 5 strings from the uploaded files (skipped: 2, not found: 3, updated: 0)."
    );
}

/// Test that accepted strings produce a success message
#[test]
fn test_classify_withAcceptedStrings_shouldReturnSuccess() {
    let (reporter, _) = reporter();
    let message = reporter.classify(Ok(outcome(1, 2, 7, 10)), Path::new("/srv/c"));

    assert_eq!(message.severity, Severity::Success);
    assert_eq!(
        message.text,
        "Processed 10 strings from the uploaded files (skipped: 2, not found: 1, updated: 7)."
    );
}

/// Test that a single-string upload uses the singular template
#[test]
fn test_classify_withSingleString_shouldUseSingularForm() {
    let (reporter, _) = reporter();
    let message = reporter.classify(Ok(outcome(0, 0, 1, 1)), Path::new("/srv/c"));

    assert!(message.text.starts_with("Processed 1 string from"));
}

/// Test that a plural-forms mismatch maps to the fixed error message with no
/// counts and no operator report
#[test]
fn test_classify_withPluralMismatch_shouldReturnFixedError() {
    let (reporter, sink) = reporter();
    let message = reporter.classify(
        Err(MergeError::PluralFormsMismatch {
            file_forms: 6,
            expected_forms: 2,
        }),
        Path::new("/srv/c"),
    );

    assert_eq!(message.severity, Severity::Error);
    assert_eq!(
        message.text,
        "Plural forms in the uploaded file do not match current translation."
    );
    assert!(!message.text.contains('6'));
    assert!(sink.reports().is_empty());
}

/// Test that a generic failure redacts the component path and reports to the
/// operator sink
#[test]
fn test_classify_withGenericFailure_shouldRedactPathAndReport() {
    let (reporter, sink) = reporter();
    let component_path = Path::new("/var/lib/corpus/fusion/app");
    let message = reporter.classify(
        Err(MergeError::Parse(
            "invalid syntax in /var/lib/corpus/fusion/app/cs.po".to_string(),
        )),
        component_path,
    );

    assert_eq!(message.severity, Severity::Error);
    assert!(message.text.starts_with("File upload has failed:"));
    assert!(!message.text.contains("/var/lib/corpus"));
    assert!(message.text.contains("/cs.po"));

    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, "Upload error");
    // The operator report keeps the full, unredacted detail
    assert!(reports[0].1.contains("/var/lib/corpus/fusion/app/cs.po"));
}

/// Test that path redaction strips every occurrence of the fragment
#[test]
fn test_redact_path_withRepeatedFragment_shouldStripAllOccurrences() {
    let cleaned = redact_path("/srv/x/a.po and /srv/x/b.po", "/srv/x");
    assert_eq!(cleaned, "/a.po and /b.po");
}

/// Test that redaction with an empty fragment leaves the message unchanged
#[test]
fn test_redact_path_withEmptyFragment_shouldReturnMessageUnchanged() {
    assert_eq!(redact_path("parse failed", ""), "parse failed");
}
