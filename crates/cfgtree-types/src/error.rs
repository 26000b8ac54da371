use thiserror::Error;

/// Errors produced by tree operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("path not found: {}", .path.join(" "))]
    PathNotFound { path: Vec<String> },

    #[error("{op} requires a non-empty path")]
    EmptyPath { op: String },
}

/// Convenience alias for tree operations.
pub type TypeResult<T> = Result<T, TypeError>;
