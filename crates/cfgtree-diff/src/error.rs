//! Error types for the diff crate.

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// The starting path of a filtered comparison exists in neither tree.
    #[error("path not found in either configuration: {}", .path.join(" "))]
    PathNotFound { path: Vec<String> },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
