/*!
 * # locflow - Localization upload/merge and export orchestration
 *
 * A Rust library orchestrating imports of externally-supplied localization
 * files into a managed translation corpus and exports of consistent corpus
 * snapshots as downloadable archives.
 *
 * ## Features
 *
 * - Scope resolution with mandatory project-visibility filtering
 * - Capability- and lock-gated upload orchestration around a Merge Engine
 * - Pre-export consistency barrier committing pending edits to the store
 * - Archive bundling with optional on-the-fly format conversion
 * - Pluralization-correct, severity-tagged outcome reporting with local
 *   path redaction and operator error tracking
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `corpus`: Translation corpus data model and shared registry
 * - `access`: Caller capabilities and gated field derivation
 * - `resolver`: Scope descriptors to authorized resource sets
 * - `barrier`: Pre-export commit-pending barrier
 * - `bundler`: Archive assembly from backing files
 * - `export`: Export orchestration (scope archives, single downloads)
 * - `upload`: Upload gate state machine driving the Merge Engine
 * - `report`: Outcome classification and user messages
 * - `collab`: Contracts for the external collaborators:
 *   - `collab::mock`: Configurable fakes for tests
 * - `errors`: Custom error types for the orchestration core
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod access;
pub mod barrier;
pub mod bundler;
pub mod collab;
pub mod corpus;
pub mod errors;
pub mod export;
pub mod report;
pub mod resolver;
pub mod upload;

// Re-export main types for easier usage
pub use access::{Caller, Capability, derive_author, derive_flag};
pub use collab::{ArchiveBuilder, ArchiveStream, ErrorSink, FormatConverter, MergeEngine, MergeOutcome, Store};
pub use corpus::{ComponentKey, Corpus, ResourceKey, TranslationResource, Unit};
pub use errors::{FieldError, FlowError, MergeError};
pub use export::{DownloadSpec, Exporter, FileDownload};
pub use report::{Reporter, Response, Severity, UserMessage};
pub use resolver::{Scope, ScopeSet};
pub use upload::{MergeMethod, MergeParams, UploadForm, UploadOrchestrator};
