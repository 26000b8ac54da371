//! In-memory configuration source for tests and embedding.
//!
//! [`InMemoryTreeSource`] keeps every configuration in a `HashMap` behind a
//! `RwLock`. Loads hand out clones, so a caller can diff two loaded trees
//! while another thread replaces them.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use cfgtree_types::Node;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::TreeSource;

/// An in-memory implementation of [`TreeSource`].
#[derive(Debug, Default)]
pub struct InMemoryTreeSource {
    configs: RwLock<HashMap<String, Node>>,
}

impl InMemoryTreeSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    ///
    /// The source is exclusively owned here, so a poisoned lock is
    /// recovered rather than reported and the tree is always stored.
    pub fn with_config(mut self, name: impl Into<String>, tree: Node) -> Self {
        let configs = self
            .configs
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        configs.insert(name.into(), tree);
        self
    }

    /// Store `tree` under `name`, returning the tree it replaced.
    pub fn insert(&self, name: impl Into<String>, tree: Node) -> StoreResult<Option<Node>> {
        let name = name.into();
        let mut configs = self
            .configs
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        debug!(config = %name, nodes = tree.len(), "storing configuration");
        Ok(configs.insert(name, tree))
    }

    /// Drop the configuration named `name`, returning it if it existed.
    pub fn remove(&self, name: &str) -> StoreResult<Option<Node>> {
        let mut configs = self
            .configs
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(configs.remove(name))
    }
}

impl TreeSource for InMemoryTreeSource {
    fn load(&self, name: &str) -> StoreResult<Node> {
        let configs = self
            .configs
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        configs
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::ConfigNotFound {
                name: name.to_string(),
            })
    }

    fn names(&self) -> StoreResult<Vec<String>> {
        let configs = self
            .configs
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let mut names: Vec<String> = configs.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn contains(&self, name: &str) -> StoreResult<bool> {
        let configs = self
            .configs
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(configs.contains_key(name))
    }
}
