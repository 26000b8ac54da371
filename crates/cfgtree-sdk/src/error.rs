use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("store error: {0}")]
    Store(#[from] cfgtree_store::StoreError),

    #[error("diff error: {0}")]
    Diff(#[from] cfgtree_diff::DiffError),
}

pub type SdkResult<T> = Result<T, SdkError>;
