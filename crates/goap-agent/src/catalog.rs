//! Registry of action definitions shared by every agent of a kind

use std::sync::Arc;

use goap_core::{GoapError, Result};
use tracing::debug;

use crate::action::{ActionDef, ActionInstance};
use crate::behavior::Behavior;

type BehaviorFactory<A> = Box<dyn Fn() -> Box<dyn Behavior<A>>>;

struct CatalogEntry<A> {
    def: Arc<ActionDef>,
    factory: BehaviorFactory<A>,
}

/// Definitions are frozen on registration and shared read-only; each agent
/// gets its own records and behaviors through [`ActionCatalog::instantiate`].
pub struct ActionCatalog<A> {
    entries: Vec<CatalogEntry<A>>,
}

impl<A> ActionCatalog<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a definition with a factory producing a fresh behavior per agent.
    pub fn register<B, F>(&mut self, def: ActionDef, factory: F) -> Result<()>
    where
        B: Behavior<A> + 'static,
        F: Fn() -> B + 'static,
    {
        if self.get(def.name()).is_some() {
            return Err(GoapError::DuplicateAction(def.name().to_string()));
        }
        debug!(action = def.name(), cost = def.cost(), "registered action");
        self.entries.push(CatalogEntry {
            def: Arc::new(def),
            factory: Box::new(move || Box::new(factory()) as Box<dyn Behavior<A>>),
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ActionDef>> {
        self.entries
            .iter()
            .find(|e| e.def.name() == name)
            .map(|e| &e.def)
    }

    /// Like [`ActionCatalog::get`] but a missing name is an error
    pub fn definition(&self, name: &str) -> Result<&ActionDef> {
        self.get(name)
            .map(|def| def.as_ref())
            .ok_or_else(|| GoapError::UnknownAction(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.def.name())
    }

    /// Build one agent's action set, in registration order
    pub fn instantiate(&self) -> Vec<ActionInstance<A>> {
        self.entries
            .iter()
            .map(|e| ActionInstance::new(e.def.clone(), (e.factory)()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A> Default for ActionCatalog<A> {
    fn default() -> Self {
        Self::new()
    }
}
