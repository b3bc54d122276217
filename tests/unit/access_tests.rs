/*!
 * Tests for capability-gated field derivation and caller visibility
 */

use locflow::{Caller, Capability, derive_author, derive_flag};

/// Test that derive_flag passes the submitted value through with capability
#[test]
fn test_derive_flag_withCapability_shouldKeepSubmittedValue() {
    assert!(derive_flag(true, true));
    assert!(!derive_flag(false, true));
}

/// Test that derive_flag forces false without capability
#[test]
fn test_derive_flag_withoutCapability_shouldForceFalse() {
    assert!(!derive_flag(true, false));
    assert!(!derive_flag(false, false));
}

/// Test that derive_author keeps submitted fields with capability
#[test]
fn test_derive_author_withCapability_shouldKeepSubmittedFields() {
    let (name, email) = derive_author("Jana Novak", "jana@example.com", true);
    assert_eq!(name, "Jana Novak");
    assert_eq!(email, "jana@example.com");
}

/// Test that derive_author forces empty fields without capability
#[test]
fn test_derive_author_withoutCapability_shouldForceEmptyFields() {
    let (name, email) = derive_author("Jana Novak", "jana@example.com", false);
    assert!(name.is_empty());
    assert!(email.is_empty());
}

/// Test that capability checks only match granted capabilities
#[test]
fn test_caller_has_withGrantedCapability_shouldReturnTrue() {
    let caller = Caller::new("translator").with_capability(Capability::UploadPerform);
    assert!(caller.has(Capability::UploadPerform));
    assert!(!caller.has(Capability::UploadOverwrite));
}

/// Test that project visibility only matches granted projects
#[test]
fn test_caller_can_see_withInvisibleProject_shouldReturnFalse() {
    let caller = Caller::new("translator").with_visible_project("fusion");
    assert!(caller.can_see("fusion"));
    assert!(!caller.can_see("orbit"));
}
