/*!
 * Pre-export consistency barrier.
 *
 * Every component in an export scope gets its pending in-memory edits
 * flushed to the backing store before the bundler reads any filename. The
 * exported archive therefore reflects the most recent committed state as of
 * the start of the export call; edits made strictly after the barrier are
 * not required to be visible, only not to be lost.
 */

use log::{debug, info};
use std::sync::Arc;

use crate::collab::Store;
use crate::corpus::ComponentKey;
use crate::errors::FlowError;

/// Barrier over the Store collaborator
#[derive(Debug, Clone)]
pub struct ConsistencyBarrier {
    store: Arc<dyn Store>,
}

impl ConsistencyBarrier {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Flush pending edits for every distinct component, awaiting each
    /// commit before the caller may read a single file
    pub async fn flush(&self, components: &[ComponentKey], reason: &str) -> Result<(), FlowError> {
        let mut seen = std::collections::HashSet::new();
        for component in components {
            if !seen.insert(component.clone()) {
                continue;
            }
            debug!("committing pending edits for {component} ({reason})");
            self.store
                .commit_pending(component, reason, None)
                .await
                .map_err(|e| FlowError::Store(e.to_string()))?;
        }
        info!("consistency barrier passed for {} component(s)", seen.len());
        Ok(())
    }
}
