//! The three-way rule table.
//!
//! Each path is decided from the blob id it has in the current head, the
//! given head and the split point. Only ids are compared; content is never
//! inspected here.

use serde::{Deserialize, Serialize};
use twig_types::ObjectId;

/// How one path ends up in the merged snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The path is tracked at this id.
    Keep(ObjectId),
    /// The path is dropped.
    Omit,
    /// Both sides changed the path in incompatible ways.
    Conflict(ConflictKind),
}

/// Which sides produced a conflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Both heads changed the file, differently.
    BothModified,
    /// The current head changed the file, the given head deleted it.
    ModifiedDeleted,
    /// The given head changed the file, the current head deleted it.
    DeletedModified,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BothModified => write!(f, "both modified"),
            Self::ModifiedDeleted => write!(f, "modified here, deleted in given"),
            Self::DeletedModified => write!(f, "deleted here, modified in given"),
        }
    }
}

/// Decide one path.
pub fn reconcile(
    current: Option<ObjectId>,
    given: Option<ObjectId>,
    split: Option<ObjectId>,
) -> Resolution {
    match (current, given) {
        (None, None) => Resolution::Omit,
        (Some(c), Some(g)) if c == g => Resolution::Keep(c),
        (Some(c), Some(g)) => {
            if split == Some(c) {
                Resolution::Keep(g)
            } else if split == Some(g) {
                Resolution::Keep(c)
            } else {
                Resolution::Conflict(ConflictKind::BothModified)
            }
        }
        (Some(c), None) => match split {
            None => Resolution::Keep(c),
            Some(s) if s == c => Resolution::Omit,
            Some(_) => Resolution::Conflict(ConflictKind::ModifiedDeleted),
        },
        (None, Some(g)) => match split {
            None => Resolution::Keep(g),
            Some(s) if s == g => Resolution::Omit,
            Some(_) => Resolution::Conflict(ConflictKind::DeletedModified),
        },
    }
}
