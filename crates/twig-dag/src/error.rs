//! Error types for commit graph operations.

use twig_store::StoreError;
use twig_types::ObjectId;

/// Errors that can occur while reading or walking commit history.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// A referenced commit is not in the store.
    #[error("commit not found: {0}")]
    CommitNotFound(ObjectId),

    /// Two histories share no commit.
    #[error("no common ancestor between {current} and {given}")]
    NoCommonAncestor {
        /// Head of the current branch.
        current: ObjectId,
        /// Head of the branch being merged in.
        given: ObjectId,
    },

    /// Underlying object store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for commit graph results.
pub type DagResult<T> = Result<T, DagError>;
