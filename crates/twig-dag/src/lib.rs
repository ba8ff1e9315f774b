//! Commit history for twig.
//!
//! A [`Commit`] is an immutable node referencing a full directory
//! [`Snapshot`](twig_types::Snapshot) and up to two parents. [`CommitGraph`]
//! walks the history stored in any [`ObjectStore`](twig_store::ObjectStore):
//! first-parent history, full ancestor sets, and the split point used as a
//! merge base.

pub mod commit;
pub mod error;
pub mod graph;

pub use commit::Commit;
pub use error::{DagError, DagResult};
pub use graph::CommitGraph;
