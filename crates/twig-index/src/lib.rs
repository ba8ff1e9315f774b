//! Staging index for twig.
//!
//! The index is the snapshot of the next commit. It is reseeded from a
//! commit's snapshot on checkout, reset and merge, edited by `add` and `rm`,
//! and shares storage with the commit it becomes.
//!
//! # Key Types
//!
//! - [`Index`] -- The staging area, backed by a copy-on-write [`Snapshot`](twig_types::Snapshot)
//! - [`AddOutcome`] / [`RemoveOutcome`] -- What staging a path did
//! - [`WorkdirStatus`] -- Result of status computation
//! - [`FileStatus`] -- Kind of change (New, Modified, Deleted)

pub mod error;
pub mod index;
pub mod status;

pub use error::{IndexError, IndexResult};
pub use index::{AddOutcome, Index, RemoveOutcome};
pub use status::{FileStatus, StatusEntry, WorkdirStatus};
