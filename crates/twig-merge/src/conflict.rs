use serde::{Deserialize, Serialize};
use twig_types::ObjectId;

use crate::reconcile::ConflictKind;

const OURS_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const SEPARATOR: &[u8] = b"=======\n";
const THEIRS_MARKER: &[u8] = b">>>>>>>";

/// Content of a conflict blob: both versions between markers.
///
/// A side that deleted the file contributes empty content. No newline is
/// inserted after either side or after the closing marker.
pub fn conflict_content(current: &[u8], given: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        OURS_MARKER.len() + current.len() + SEPARATOR.len() + given.len() + THEIRS_MARKER.len(),
    );
    out.extend_from_slice(OURS_MARKER);
    out.extend_from_slice(current);
    out.extend_from_slice(SEPARATOR);
    out.extend_from_slice(given);
    out.extend_from_slice(THEIRS_MARKER);
    out
}

/// A path that could not be merged automatically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConflict {
    pub path: String,
    pub kind: ConflictKind,
    /// Blob id in the current head, if present.
    pub current: Option<ObjectId>,
    /// Blob id in the given head, if present.
    pub given: Option<ObjectId>,
    /// The synthesized conflict blob now tracked at `path`.
    pub blob: ObjectId,
}
