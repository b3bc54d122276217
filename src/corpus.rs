/*!
 * Data model for the managed translation corpus.
 *
 * The corpus holds projects, components, per-language translation resources
 * and named component lists. It is shared between concurrent requests behind
 * a read/write lock; resolvers take read access, commits take write access.
 */

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// @module: In-memory corpus registry and model types

/// Identity of one translation resource: one language's file for one component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub project: String,
    pub component: String,
    pub language: String,
}

impl ResourceKey {
    pub fn new(project: &str, component: &str, language: &str) -> Self {
        Self {
            project: project.to_string(),
            component: component.to_string(),
            language: language.to_string(),
        }
    }

    /// Canonical view URL the request redirects back to
    pub fn canonical_url(&self) -> String {
        format!("/{}/{}/{}/", self.project, self.component, self.language)
    }

    pub fn component_key(&self) -> ComponentKey {
        ComponentKey {
            project: self.project.clone(),
            component: self.component.clone(),
        }
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.project, self.component, self.language)
    }
}

/// Identity of a component within a project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentKey {
    pub project: String,
    pub component: String,
}

impl ComponentKey {
    pub fn new(project: &str, component: &str) -> Self {
        Self {
            project: project.to_string(),
            component: component.to_string(),
        }
    }
}

impl std::fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.project, self.component)
    }
}

/// One translatable string within a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Stable unit identifier within the resource
    pub id: u64,

    /// Source-language string
    pub source: String,

    /// Translated string, empty when untranslated
    #[serde(default)]
    pub target: String,
}

/// One language's translation file for one component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResource {
    /// Language code of this resource
    pub language: String,

    /// Backing file path, absent for virtual or not-yet-created resources
    #[serde(default)]
    pub filename: Option<PathBuf>,

    /// Unit collection, searchable by free-text query
    #[serde(default)]
    pub units: Vec<Unit>,

    /// Lock state inherited from the owning component, filled at resolve time
    #[serde(skip)]
    pub locked: bool,

    /// Identifying key, filled at resolve time
    #[serde(skip, default = "ResourceKey::placeholder")]
    pub key: ResourceKey,
}

impl ResourceKey {
    fn placeholder() -> Self {
        Self::new("", "", "")
    }
}

impl TranslationResource {
    /// Search the unit collection by a free-text query, case-insensitive on
    /// source and target, de-duplicating by unit id
    pub fn search_units(&self, query: &str) -> Vec<Unit> {
        let needle = query.to_lowercase();
        let mut seen = std::collections::HashSet::new();
        self.units
            .iter()
            .filter(|u| {
                needle.is_empty()
                    || u.source.to_lowercase().contains(&needle)
                    || u.target.to_lowercase().contains(&needle)
            })
            .filter(|u| seen.insert(u.id))
            .cloned()
            .collect()
    }
}

/// A named translatable unit grouping resources across languages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Owning project slug
    pub project: String,

    /// Component slug
    pub slug: String,

    /// Full storage path of the component's checkout
    pub full_path: PathBuf,

    /// Lock flag: true rejects all uploads
    #[serde(default)]
    pub locked: bool,

    /// Whether in-memory edits are waiting to be flushed to the store
    #[serde(default)]
    pub pending: bool,

    /// Per-language resources owned by this component
    #[serde(default)]
    pub resources: Vec<TranslationResource>,
}

impl Component {
    pub fn key(&self) -> ComponentKey {
        ComponentKey::new(&self.project, &self.slug)
    }
}

/// A named, user-curated grouping of components, possibly spanning projects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentList {
    pub slug: String,
    pub name: String,
    pub components: Vec<ComponentKey>,
}

/// A language known to the corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// Language code, e.g. "cs" or "pt_BR"
    pub code: String,

    /// English display name when the code maps to an ISO 639 language
    #[serde(default)]
    pub name: String,

    /// Number of plural forms the language expects
    pub plural_forms: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CorpusState {
    #[serde(default)]
    languages: Vec<LanguageInfo>,
    #[serde(default)]
    projects: Vec<String>,
    #[serde(default)]
    components: Vec<Component>,
    #[serde(default)]
    lists: Vec<ComponentList>,
}

/// Shared in-memory corpus registry
#[derive(Debug, Default)]
pub struct Corpus {
    state: RwLock<CorpusState>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a corpus snapshot from its JSON representation
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let mut state: CorpusState = serde_json::from_str(content)?;
        for component in &mut state.components {
            for resource in &mut component.resources {
                resource.key =
                    ResourceKey::new(&component.project, &component.slug, &resource.language);
            }
        }
        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Register a language; the display name is resolved from ISO 639 when
    /// the code is a plain two-letter code
    pub fn add_language(&self, code: &str, plural_forms: usize) {
        let name = isolang::Language::from_639_1(code)
            .map(|l| l.to_name().to_string())
            .unwrap_or_else(|| code.to_string());
        self.state.write().languages.push(LanguageInfo {
            code: code.to_string(),
            name,
            plural_forms,
        });
    }

    pub fn add_project(&self, slug: &str) {
        self.state.write().projects.push(slug.to_string());
    }

    pub fn add_component(&self, project: &str, slug: &str, full_path: &std::path::Path) {
        self.state.write().components.push(Component {
            project: project.to_string(),
            slug: slug.to_string(),
            full_path: full_path.to_path_buf(),
            locked: false,
            pending: false,
            resources: Vec::new(),
        });
    }

    /// Attach a resource to an existing component; no-op when the component
    /// is unknown
    pub fn add_resource(&self, key: &ResourceKey, filename: Option<PathBuf>, units: Vec<Unit>) {
        let mut state = self.state.write();
        if let Some(component) = state
            .components
            .iter_mut()
            .find(|c| c.project == key.project && c.slug == key.component)
        {
            component.resources.push(TranslationResource {
                language: key.language.clone(),
                filename,
                units,
                locked: component.locked,
                key: key.clone(),
            });
        }
    }

    pub fn add_component_list(&self, slug: &str, name: &str, components: Vec<ComponentKey>) {
        self.state.write().lists.push(ComponentList {
            slug: slug.to_string(),
            name: name.to_string(),
            components,
        });
    }

    pub fn set_locked(&self, key: &ComponentKey, locked: bool) {
        let mut state = self.state.write();
        if let Some(component) = state
            .components
            .iter_mut()
            .find(|c| c.project == key.project && c.slug == key.component)
        {
            component.locked = locked;
        }
    }

    /// Mark a component as holding unflushed in-memory edits
    pub fn mark_pending(&self, key: &ComponentKey) {
        let mut state = self.state.write();
        if let Some(component) = state
            .components
            .iter_mut()
            .find(|c| c.project == key.project && c.slug == key.component)
        {
            component.pending = true;
        }
    }

    /// Clear the pending flag, returning whether anything was pending
    pub fn take_pending(&self, key: &ComponentKey) -> bool {
        let mut state = self.state.write();
        if let Some(component) = state
            .components
            .iter_mut()
            .find(|c| c.project == key.project && c.slug == key.component)
        {
            let was_pending = component.pending;
            component.pending = false;
            was_pending
        } else {
            false
        }
    }

    pub fn has_project(&self, slug: &str) -> bool {
        self.state.read().projects.iter().any(|p| p == slug)
    }

    pub fn language(&self, code: &str) -> Option<LanguageInfo> {
        self.state
            .read()
            .languages
            .iter()
            .find(|l| l.code == code)
            .cloned()
    }

    /// Component snapshot by key
    pub fn component(&self, key: &ComponentKey) -> Option<Component> {
        self.state
            .read()
            .components
            .iter()
            .find(|c| c.project == key.project && c.slug == key.component)
            .cloned()
    }

    /// All components of one project, in registration order
    pub fn components_of(&self, project: &str) -> Vec<Component> {
        self.state
            .read()
            .components
            .iter()
            .filter(|c| c.project == project)
            .cloned()
            .collect()
    }

    /// Component list by slug, matched case-insensitively
    pub fn component_list(&self, slug: &str) -> Option<ComponentList> {
        self.state
            .read()
            .lists
            .iter()
            .find(|l| l.slug.eq_ignore_ascii_case(slug))
            .cloned()
    }

    /// Resource snapshot with key and inherited lock state filled in
    pub fn resource(&self, key: &ResourceKey) -> Option<TranslationResource> {
        let state = self.state.read();
        let component = state
            .components
            .iter()
            .find(|c| c.project == key.project && c.slug == key.component)?;
        let resource = component
            .resources
            .iter()
            .find(|r| r.language == key.language)?;
        let mut resource = resource.clone();
        resource.locked = component.locked;
        resource.key = key.clone();
        Some(resource)
    }
}
