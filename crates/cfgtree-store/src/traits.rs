//! The [`TreeSource`] trait defining where configuration trees come from.

use cfgtree_types::Node;

use crate::error::StoreResult;

/// The committed configuration that is currently in effect.
pub const ACTIVE_CFG: &str = "active";

/// The candidate configuration being edited in a session.
pub const WORKING_CFG: &str = "working";

/// Supplier of configuration trees by name.
///
/// Implementations must be thread-safe (`Send + Sync`). A load either
/// returns a complete tree or an error; callers never see a partial tree.
pub trait TreeSource: Send + Sync {
    /// Materialize the configuration known as `name`.
    ///
    /// Returns [`StoreError::ConfigNotFound`] if there is none.
    ///
    /// [`StoreError::ConfigNotFound`]: crate::StoreError::ConfigNotFound
    fn load(&self, name: &str) -> StoreResult<Node>;

    /// All configuration names this source can load, sorted.
    fn names(&self) -> StoreResult<Vec<String>>;

    /// Whether a configuration named `name` exists.
    fn contains(&self, name: &str) -> StoreResult<bool> {
        Ok(self.names()?.iter().any(|n| n == name))
    }
}
