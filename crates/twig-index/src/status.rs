//! Working directory status.
//!
//! Compares three states of every path: the HEAD snapshot, the index, and the
//! working directory (given as the blob id each working file would have if it
//! were added).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use twig_types::{ObjectId, Snapshot};

use crate::index::Index;

/// Complete status of the working directory. Every list is sorted by path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdirStatus {
    /// Paths whose index entry is new or differs from HEAD.
    pub staged: Vec<StatusEntry>,
    /// Paths tracked by HEAD but dropped from the index.
    pub removed: Vec<String>,
    /// Indexed paths whose working file differs from the index or is gone.
    pub unstaged: Vec<StatusEntry>,
    /// Working files the index does not know about.
    pub untracked: Vec<String>,
}

impl WorkdirStatus {
    pub fn compute(index: &Index, head: &Snapshot, working: &BTreeMap<String, ObjectId>) -> Self {
        let mut status = Self::default();

        for (path, id) in index.snapshot() {
            match head.get(path) {
                None => status.staged.push(StatusEntry::new(path, FileStatus::New)),
                Some(committed) if committed != *id => {
                    status.staged.push(StatusEntry::new(path, FileStatus::Modified))
                }
                Some(_) => {}
            }

            match working.get(path) {
                None => status
                    .unstaged
                    .push(StatusEntry::new(path, FileStatus::Deleted)),
                Some(current) if current != id => status
                    .unstaged
                    .push(StatusEntry::new(path, FileStatus::Modified)),
                Some(_) => {}
            }
        }

        status.removed = head
            .paths()
            .filter(|path| !index.contains(path))
            .map(str::to_string)
            .collect();
        status.untracked = working
            .keys()
            .filter(|path| !index.contains(path))
            .cloned()
            .collect();

        status
    }

    /// Returns `true` if there are no changes of any kind.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty()
            && self.removed.is_empty()
            && self.unstaged.is_empty()
            && self.untracked.is_empty()
    }

    /// Returns `true` if the next commit would differ from HEAD.
    pub fn has_staged_changes(&self) -> bool {
        !self.staged.is_empty() || !self.removed.is_empty()
    }
}

/// A single status entry representing a file change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// The file path relative to the workdir root.
    pub path: String,
    /// The kind of change.
    pub status: FileStatus,
}

impl StatusEntry {
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// The kind of file change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    New,
    Modified,
    Deleted,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Modified => write!(f, "modified"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}
