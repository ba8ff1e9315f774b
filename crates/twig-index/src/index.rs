//! The staging area.
//!
//! [`Index`] holds a complete [`Snapshot`] of the next commit rather than a
//! list of pending changes. Staging writes the blob to the object store;
//! everything else happens in memory and is persisted by the caller.

use serde::{Deserialize, Serialize};
use tracing::debug;
use twig_store::{Blob, ObjectStore};
use twig_types::{ObjectId, Snapshot};

use crate::error::{IndexError, IndexResult};

/// What [`Index::add`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// The path was already staged at this content.
    Unchanged,
    /// The content matches HEAD; the path is back to its committed version.
    Reverted,
    /// New content was stored and staged.
    Staged(ObjectId),
}

/// What [`Index::remove`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The path was only staged; HEAD does not track it.
    Unstaged,
    /// HEAD tracks the path; the next commit drops it and the working file
    /// should be deleted.
    Untracked,
}

/// The staging index: the full snapshot of the next commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    entries: Snapshot,
}

impl Index {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// An index seeded from a commit's snapshot. Storage is shared.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            entries: snapshot.clone(),
        }
    }

    /// Replace every entry with `snapshot`.
    pub fn reset_to(&mut self, snapshot: &Snapshot) {
        self.entries = snapshot.clone();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Blob id staged at `path`.
    pub fn get(&self, path: &str) -> Option<ObjectId> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains(path)
    }

    /// Staged paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.paths()
    }

    /// The staged snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.entries
    }

    /// Returns `true` if the index holds exactly the entries of `snapshot`.
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        self.entries.same_entries(snapshot)
    }

    /// Stage `blob` at its path.
    ///
    /// `head` is the snapshot of the checked-out commit. Content equal to the
    /// committed version is not stored again.
    pub fn add<S: ObjectStore + ?Sized>(
        &mut self,
        store: &S,
        blob: &Blob,
        head: &Snapshot,
    ) -> IndexResult<AddOutcome> {
        if blob.path.is_empty() {
            return Err(IndexError::InvalidPath("empty path".to_string()));
        }

        let stored = blob.to_stored_object()?;
        let id = stored.compute_id();
        if self.entries.get(&blob.path) == Some(id) {
            return Ok(AddOutcome::Unchanged);
        }
        if head.get(&blob.path) == Some(id) {
            // Reset to the committed id, not removed: a missing entry is a
            // staged removal.
            self.entries.insert(blob.path.clone(), id);
            debug!(path = %blob.path, "restored committed version in index");
            return Ok(AddOutcome::Reverted);
        }

        store.save(&stored)?;
        self.entries.insert(blob.path.clone(), id);
        debug!(path = %blob.path, id = %id.short_hex(), "staged file");
        Ok(AddOutcome::Staged(id))
    }

    /// Drop `path` from the next commit.
    ///
    /// Fails without touching the index when the path is neither staged nor
    /// tracked by `head`.
    pub fn remove(&mut self, path: &str, head: &Snapshot) -> IndexResult<RemoveOutcome> {
        let tracked = head.contains(path);
        if !tracked && !self.entries.contains(path) {
            return Err(IndexError::NothingToRemove(path.to_string()));
        }
        self.entries.remove(path);
        debug!(path, tracked, "removed from index");
        Ok(if tracked {
            RemoveOutcome::Untracked
        } else {
            RemoveOutcome::Unstaged
        })
    }
}
