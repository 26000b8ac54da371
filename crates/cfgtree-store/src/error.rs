//! Error types for configuration sources.

use thiserror::Error;

/// Errors that can occur while looking up a configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No configuration is known under this name.
    #[error("configuration not found: {name}")]
    ConfigNotFound { name: String },

    /// A lock guarding the source was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience type alias for source operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
