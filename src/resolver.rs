/*!
 * Resource resolution: scope descriptors to authorized resource sets.
 *
 * Project-visibility filtering happens here, before anything else touches
 * the resources; an unauthorized resource never reaches the bundler or the
 * upload orchestrator.
 */

use log::debug;

use crate::access::Caller;
use crate::corpus::{Component, ComponentKey, Corpus, ResourceKey, TranslationResource};
use crate::errors::FlowError;

/// Scope descriptor derived from the request's identifying path segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// A named, user-curated component list
    ComponentList { slug: String },
    /// Every resource of one project
    Project { project: String },
    /// One project filtered by language
    ProjectLanguage { project: String, language: String },
    /// Every resource of one component
    Component { project: String, component: String },
    /// A single translation resource
    Resource(ResourceKey),
}

/// The resolved, authorized scope: distinct components plus their in-scope
/// resources, in registration order
#[derive(Debug, Clone, Default)]
pub struct ScopeSet {
    pub components: Vec<ComponentKey>,
    pub resources: Vec<TranslationResource>,
}

/// Resolve a scope descriptor to the resource set the caller may see.
///
/// Fails with `NotFound` when the descriptor names a nonexistent entity or a
/// project the caller cannot see; component lists silently drop members from
/// invisible projects instead.
pub fn resolve_scope(corpus: &Corpus, caller: &Caller, scope: &Scope) -> Result<ScopeSet, FlowError> {
    let set = match scope {
        Scope::ComponentList { slug } => {
            let list = corpus
                .component_list(slug)
                .ok_or_else(|| FlowError::NotFound(format!("component list '{slug}'")))?;
            let components: Vec<Component> = list
                .components
                .iter()
                .filter(|key| caller.can_see(&key.project))
                .filter_map(|key| corpus.component(key))
                .collect();
            collect(components, None)
        }
        Scope::Project { project } => {
            let components = visible_project_components(corpus, caller, project)?;
            collect(components, None)
        }
        Scope::ProjectLanguage { project, language } => {
            let components = visible_project_components(corpus, caller, project)?;
            if corpus.language(language).is_none() {
                return Err(FlowError::NotFound(format!("language '{language}'")));
            }
            collect(components, Some(language))
        }
        Scope::Component { project, component } => {
            if !caller.can_see(project) || !corpus.has_project(project) {
                return Err(FlowError::NotFound(format!("project '{project}'")));
            }
            let key = ComponentKey::new(project, component);
            let found = corpus
                .component(&key)
                .ok_or_else(|| FlowError::NotFound(format!("component '{key}'")))?;
            collect(vec![found], None)
        }
        Scope::Resource(key) => {
            let resource = resolve_resource(corpus, caller, key)?;
            ScopeSet {
                components: vec![key.component_key()],
                resources: vec![resource],
            }
        }
    };
    debug!(
        "resolved scope {:?}: {} component(s), {} resource(s)",
        scope,
        set.components.len(),
        set.resources.len()
    );
    Ok(set)
}

/// Resolve a single resource, applying the same visibility rules
pub fn resolve_resource(
    corpus: &Corpus,
    caller: &Caller,
    key: &ResourceKey,
) -> Result<TranslationResource, FlowError> {
    if !caller.can_see(&key.project) || !corpus.has_project(&key.project) {
        return Err(FlowError::NotFound(format!("project '{}'", key.project)));
    }
    corpus
        .resource(key)
        .ok_or_else(|| FlowError::NotFound(format!("translation '{key}'")))
}

fn visible_project_components(
    corpus: &Corpus,
    caller: &Caller,
    project: &str,
) -> Result<Vec<Component>, FlowError> {
    if !caller.can_see(project) || !corpus.has_project(project) {
        return Err(FlowError::NotFound(format!("project '{project}'")));
    }
    Ok(corpus.components_of(project))
}

/// Flatten components into a scope set, propagating the component key and
/// lock state onto each resource snapshot
fn collect(components: Vec<Component>, language: Option<&str>) -> ScopeSet {
    let mut set = ScopeSet::default();
    for component in components {
        set.components.push(component.key());
        for resource in &component.resources {
            if let Some(language) = language {
                if resource.language != language {
                    continue;
                }
            }
            let mut resource = resource.clone();
            resource.locked = component.locked;
            resource.key =
                ResourceKey::new(&component.project, &component.slug, &resource.language);
            set.resources.push(resource);
        }
    }
    set
}
