//! Error types for merge operations.

use twig_dag::DagError;
use twig_store::StoreError;

/// Errors that can occur while merging two histories.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// History traversal failed.
    #[error("history error: {0}")]
    Dag(#[from] DagError),

    /// Reading or writing a blob failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
