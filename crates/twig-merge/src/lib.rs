//! Merge engine for twig.
//!
//! Merging `given` into `current` first finds their split point. If one head
//! already contains the other the merge is a fast-forward or a no-op.
//! Otherwise every path is reconciled against the split snapshot with the
//! rule table in [`reconcile`], and paths changed on both sides become
//! conflict blobs that embed both versions.

pub mod conflict;
pub mod engine;
pub mod error;
pub mod reconcile;

pub use conflict::{conflict_content, MergeConflict};
pub use engine::{MergeEngine, MergeOutcome, MergePlan};
pub use error::{MergeError, MergeResult};
pub use reconcile::{reconcile, ConflictKind, Resolution};
