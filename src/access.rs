/*!
 * Caller identity and capability-gated field derivation.
 *
 * The derivation helpers are deliberately pure functions so the policy
 * (submitted value vs. capability) can be tested in isolation instead of
 * living as inline conditionals in the orchestration path.
 */

use std::collections::HashSet;

/// Capabilities checked by the upload orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Perform an upload against the target resource
    UploadPerform,
    /// Claim authorship of uploaded strings
    UploadAuthorship,
    /// Overwrite existing translations on upload
    UploadOverwrite,
}

/// The authenticated caller of one request
#[derive(Debug, Clone)]
pub struct Caller {
    pub username: String,
    capabilities: HashSet<Capability>,
    visible_projects: HashSet<String>,
}

impl Caller {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            capabilities: HashSet::new(),
            visible_projects: HashSet::new(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn with_visible_project(mut self, project: &str) -> Self {
        self.visible_projects.insert(project.to_string());
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Project-visibility filter applied before any further processing
    pub fn can_see(&self, project: &str) -> bool {
        self.visible_projects.contains(project)
    }
}

/// Effective boolean form value under a capability gate: forced false when
/// the caller lacks the capability
pub fn derive_flag(submitted: bool, has_capability: bool) -> bool {
    submitted && has_capability
}

/// Effective author fields under the authorship gate: forced empty when the
/// caller lacks the capability, so the system of record attributes the change
/// to the caller's own identity
pub fn derive_author(name: &str, email: &str, has_capability: bool) -> (String, String) {
    if has_capability {
        (name.to_string(), email.to_string())
    } else {
        (String::new(), String::new())
    }
}
