//! Merge orchestration over the object store.
//!
//! [`MergeEngine`] decides what a merge does and writes any conflict blobs.
//! Creating the merge commit and moving refs is left to the caller, which
//! knows the branch names.

use std::collections::BTreeSet;

use tracing::{debug, info};
use twig_dag::CommitGraph;
use twig_store::{Blob, ObjectStore};
use twig_types::{ObjectId, Snapshot};

use crate::conflict::{conflict_content, MergeConflict};
use crate::error::MergeResult;
use crate::reconcile::{reconcile, Resolution};

/// What merging `given` into `current` amounts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// `current` is an ancestor of `given`; move to `given` without a commit.
    FastForward(ObjectId),
    /// `given` is already reachable from `current`; nothing to do.
    AlreadyMerged,
    /// A real merge: the snapshot for the merge commit.
    Merged(MergePlan),
}

/// Result of a three-way reconciliation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergePlan {
    pub split: ObjectId,
    pub snapshot: Snapshot,
    /// Conflicted paths in path order.
    pub conflicts: Vec<MergeConflict>,
}

impl MergePlan {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

pub struct MergeEngine<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ObjectStore + ?Sized> MergeEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Merge the commit `given` into the commit `current`.
    pub fn merge(&self, current: &ObjectId, given: &ObjectId) -> MergeResult<MergeOutcome> {
        let graph = CommitGraph::new(self.store);
        let split = graph.split_point(current, given)?;

        if split == *current {
            debug!(to = %given.short_hex(), "merge is a fast-forward");
            return Ok(MergeOutcome::FastForward(*given));
        }
        if split == *given {
            debug!(given = %given.short_hex(), "given head already merged");
            return Ok(MergeOutcome::AlreadyMerged);
        }

        let current_snapshot = graph.commit(current)?.snapshot;
        let given_snapshot = graph.commit(given)?.snapshot;
        let split_snapshot = graph.commit(&split)?.snapshot;

        let (snapshot, conflicts) =
            self.reconcile_snapshots(&current_snapshot, &given_snapshot, &split_snapshot)?;
        info!(
            split = %split.short_hex(),
            paths = snapshot.len(),
            conflicts = conflicts.len(),
            "reconciled merge"
        );
        Ok(MergeOutcome::Merged(MergePlan {
            split,
            snapshot,
            conflicts,
        }))
    }

    /// Apply the rule table to every path of the three snapshots.
    ///
    /// The result starts as a copy of `current` and only diverges from it
    /// where the merge changes something. Conflict blobs are saved to the
    /// store.
    pub fn reconcile_snapshots(
        &self,
        current: &Snapshot,
        given: &Snapshot,
        split: &Snapshot,
    ) -> MergeResult<(Snapshot, Vec<MergeConflict>)> {
        let paths: BTreeSet<&str> = current
            .paths()
            .chain(given.paths())
            .chain(split.paths())
            .collect();

        let mut merged = current.clone();
        let mut conflicts = Vec::new();

        for path in paths {
            let ours = current.get(path);
            let theirs = given.get(path);
            match reconcile(ours, theirs, split.get(path)) {
                Resolution::Keep(id) => {
                    if ours != Some(id) {
                        merged.insert(path, id);
                    }
                }
                Resolution::Omit => {
                    merged.remove(path);
                }
                Resolution::Conflict(kind) => {
                    let blob = self.write_conflict_blob(path, ours, theirs)?;
                    debug!(path, %kind, "merge conflict");
                    merged.insert(path, blob);
                    conflicts.push(MergeConflict {
                        path: path.to_string(),
                        kind,
                        current: ours,
                        given: theirs,
                        blob,
                    });
                }
            }
        }

        Ok((merged, conflicts))
    }

    fn write_conflict_blob(
        &self,
        path: &str,
        current: Option<ObjectId>,
        given: Option<ObjectId>,
    ) -> MergeResult<ObjectId> {
        let current = self.content(current)?;
        let given = self.content(given)?;
        let blob = Blob::new(path, conflict_content(&current, &given));
        Ok(self.store.save(&blob.to_stored_object()?)?)
    }

    fn content(&self, id: Option<ObjectId>) -> MergeResult<Vec<u8>> {
        match id {
            Some(id) => Ok(Blob::from_stored_object(&self.store.load(&id)?)?.content),
            None => Ok(Vec::new()),
        }
    }
}
