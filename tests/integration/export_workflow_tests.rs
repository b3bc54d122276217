/*!
 * End-to-end export consistency tests against mock collaborators
 */

use anyhow::Result;
use std::path::Path;

use crate::common;
use locflow::{Caller, ComponentKey, DownloadSpec, FlowError, ResourceKey, Scope};

/// Test that exporting a component list runs the barrier over every visible
/// component before bundling
#[tokio::test]
async fn test_export_withComponentList_shouldCommitEachComponentOnce() {
    common::init_logging();
    let harness = common::export_harness(Path::new(common::TEST_ROOT));
    let caller = common::full_caller();

    let archive = harness
        .exporter
        .export_scope(
            &harness.corpus,
            &caller,
            &Scope::ComponentList {
                slug: "all-apps".to_string(),
            },
            None,
        )
        .await
        .unwrap();

    // fusion/app contributes cs and de, orbit/site contributes fr
    assert_eq!(archive.file_count, 3);
    let commits = harness.store.commits();
    assert_eq!(commits.len(), 2);
    assert!(commits.iter().all(|c| c.reason == "download"));
    assert_eq!(commits[0].component, ComponentKey::new("fusion", "app"));
    assert_eq!(commits[1].component, ComponentKey::new("orbit", "site"));
}

/// Scenario: a component list spanning two projects, one invisible to the
/// caller, exports only the visible project's files and never commits the
/// invisible component
#[tokio::test]
async fn test_export_withInvisibleProject_shouldExcludeItsResources() {
    let harness = common::export_harness(Path::new(common::TEST_ROOT));
    let caller = Caller::new("partial").with_visible_project("fusion");

    let archive = harness
        .exporter
        .export_scope(
            &harness.corpus,
            &caller,
            &Scope::ComponentList {
                slug: "all-apps".to_string(),
            },
            None,
        )
        .await
        .unwrap();

    let listing = String::from_utf8(archive.content.to_vec()).unwrap();
    assert!(!listing.contains("orbit"));
    assert!(harness
        .store
        .commits()
        .iter()
        .all(|c| c.component.project == "fusion"));
}

/// Test that pending edits are flushed exactly once: the second export finds
/// nothing newly pending
#[tokio::test]
async fn test_export_withPendingEdits_shouldFlushOnlyOnce() {
    let harness = common::export_harness(Path::new(common::TEST_ROOT));
    let caller = common::full_caller();
    let key = ComponentKey::new("fusion", "app");
    harness.corpus.mark_pending(&key);

    let scope = Scope::Component {
        project: "fusion".to_string(),
        component: "app".to_string(),
    };
    harness
        .exporter
        .export_scope(&harness.corpus, &caller, &scope, None)
        .await
        .unwrap();
    harness
        .exporter
        .export_scope(&harness.corpus, &caller, &scope, None)
        .await
        .unwrap();

    // Two barrier calls, only the first one had anything to flush
    assert_eq!(harness.store.commits().len(), 2);
    assert_eq!(harness.store.flush_count(), 1);
}

/// Test that a project scope resolving to zero materialized files still
/// yields a valid empty archive
#[tokio::test]
async fn test_export_withOnlyVirtualResources_shouldReturnEmptyArchive() {
    let harness = common::export_harness(Path::new(common::TEST_ROOT));
    let caller = common::full_caller();

    let archive = harness
        .exporter
        .export_scope(
            &harness.corpus,
            &caller,
            &Scope::Component {
                project: "fusion".to_string(),
                component: "docs".to_string(),
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(archive.file_count, 0);
}

/// Test that a project+language export converts files to the target format
#[tokio::test]
async fn test_export_withTargetFormat_shouldConvertFiles() {
    let harness = common::export_harness(Path::new(common::TEST_ROOT));
    let caller = common::full_caller();

    let archive = harness
        .exporter
        .export_scope(
            &harness.corpus,
            &caller,
            &Scope::ProjectLanguage {
                project: "fusion".to_string(),
                language: "de".to_string(),
            },
            Some("csv"),
        )
        .await
        .unwrap();

    let listing = String::from_utf8(archive.content.to_vec()).unwrap();
    assert!(listing.ends_with("de.csv"));
}

/// Test that downloading a resource with no query parameters returns the
/// backing file exactly as stored
#[tokio::test]
async fn test_download_resource_withEmptySpec_shouldReturnFileAsStored() -> Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let file_dir = temp_dir.path().join("fusion/app");
    std::fs::create_dir_all(&file_dir)?;
    std::fs::write(file_dir.join("cs.po"), "msgid \"Hello\"\nmsgstr \"Ahoj\"\n")?;

    let harness = common::export_harness(temp_dir.path());
    let caller = common::full_caller();

    let download = harness
        .exporter
        .download_resource(
            &harness.corpus,
            &caller,
            &ResourceKey::new("fusion", "app", "cs"),
            &DownloadSpec::default(),
        )
        .await
        .unwrap();

    assert_eq!(download.name, "cs.po");
    assert!(String::from_utf8(download.content.to_vec())?.contains("Ahoj"));
    // The barrier ran before the file was read
    assert_eq!(harness.store.commits().len(), 1);

    Ok(())
}

/// Test that a filtered download searches, de-duplicates and renders the
/// unit set instead of reading the stored file
#[tokio::test]
async fn test_download_resource_withQuery_shouldFilterAndDeduplicate() {
    let harness = common::export_harness(Path::new(common::TEST_ROOT));
    let caller = common::full_caller();

    let download = harness
        .exporter
        .download_resource(
            &harness.corpus,
            &caller,
            &ResourceKey::new("fusion", "app", "cs"),
            &DownloadSpec {
                format: None,
                q: Some("save".to_string()),
            },
        )
        .await
        .unwrap();

    let body = String::from_utf8(download.content.to_vec()).unwrap();
    // The fixture duplicates the "Save file" unit; exactly one survives
    assert_eq!(body.matches("Save file=").count(), 1);
    assert!(!body.contains("Hello"));
}

/// Test that an unsupported download format surfaces as a field-level
/// validation error
#[tokio::test]
async fn test_download_resource_withUnknownFormat_shouldFailValidation() {
    let harness = common::export_harness(Path::new(common::TEST_ROOT));
    let caller = common::full_caller();

    let result = harness
        .exporter
        .download_resource(
            &harness.corpus,
            &caller,
            &ResourceKey::new("fusion", "app", "cs"),
            &DownloadSpec {
                format: Some("xliff".to_string()),
                q: None,
            },
        )
        .await;

    match result {
        Err(FlowError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "format");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

/// Test that exporting an invisible project propagates NotFound
#[tokio::test]
async fn test_export_withInvisibleProjectScope_shouldFailNotFound() {
    let harness = common::export_harness(Path::new(common::TEST_ROOT));
    let caller = Caller::new("outsider").with_visible_project("orbit");

    let result = harness
        .exporter
        .export_scope(
            &harness.corpus,
            &caller,
            &Scope::Project {
                project: "fusion".to_string(),
            },
            None,
        )
        .await;

    assert!(matches!(result, Err(FlowError::NotFound(_))));
    assert!(harness.store.commits().is_empty());
}
