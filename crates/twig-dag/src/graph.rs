//! History traversal over commits held in an object store.
//!
//! Commits reference their parents by id, so the graph is never materialized:
//! every query walks the store directly. Ancestor queries follow both the
//! first parent and the merge parent.

use std::collections::{HashSet, VecDeque};

use tracing::debug;
use twig_store::{ObjectKind, ObjectStore};
use twig_types::ObjectId;

use crate::commit::Commit;
use crate::error::{DagError, DagResult};

/// Read-only view of the commit DAG stored in `S`.
pub struct CommitGraph<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ObjectStore + ?Sized> CommitGraph<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load and decode a commit.
    pub fn commit(&self, id: &ObjectId) -> DagResult<Commit> {
        let obj = self
            .store
            .get(id)?
            .ok_or(DagError::CommitNotFound(*id))?;
        Ok(Commit::from_stored_object(&obj)?)
    }

    /// First-parent chain from `head` back to the root, newest first.
    pub fn history(&self, head: &ObjectId) -> DagResult<Vec<(ObjectId, Commit)>> {
        let mut entries = Vec::new();
        let mut next = Some(*head);
        while let Some(id) = next {
            let commit = self.commit(&id)?;
            next = commit.parent;
            entries.push((id, commit));
        }
        Ok(entries)
    }

    /// Every commit reachable from `head` through either parent, `head`
    /// included.
    pub fn ancestors(&self, head: &ObjectId) -> DagResult<HashSet<ObjectId>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(*head);
        queue.push_back(*head);

        while let Some(id) = queue.pop_front() {
            for parent in self.commit(&id)?.parents() {
                if visited.insert(parent) {
                    queue.push_back(parent);
                }
            }
        }

        Ok(visited)
    }

    /// Merge base for `given` merged into `current`.
    ///
    /// Collects every ancestor of `current`, then walks breadth-first from
    /// `given` (first parent queued before the merge parent) and returns the
    /// first commit dequeued that `current` can also reach. In criss-cross
    /// histories this is not necessarily a lowest common ancestor.
    pub fn split_point(&self, current: &ObjectId, given: &ObjectId) -> DagResult<ObjectId> {
        let reachable = self.ancestors(current)?;

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(*given);
        queue.push_back(*given);

        while let Some(id) = queue.pop_front() {
            if reachable.contains(&id) {
                debug!(
                    current = %current.short_hex(),
                    given = %given.short_hex(),
                    split = %id.short_hex(),
                    "found split point"
                );
                return Ok(id);
            }
            for parent in self.commit(&id)?.parents() {
                if visited.insert(parent) {
                    queue.push_back(parent);
                }
            }
        }

        Err(DagError::NoCommonAncestor {
            current: *current,
            given: *given,
        })
    }

    /// Every commit in the store, in id order.
    pub fn all_commits(&self) -> DagResult<Vec<(ObjectId, Commit)>> {
        let mut commits = Vec::new();
        for id in self.store.ids()? {
            let Some(obj) = self.store.get(&id)? else {
                continue;
            };
            if obj.kind == ObjectKind::Commit {
                commits.push((id, Commit::from_stored_object(&obj)?));
            }
        }
        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use twig_store::{Blob, InMemoryObjectStore};
    use twig_types::Snapshot;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn save(store: &InMemoryObjectStore, commit: &Commit) -> ObjectId {
        store.save(&commit.to_stored_object().unwrap()).unwrap()
    }

    fn child(store: &InMemoryObjectStore, msg: &str, parent: ObjectId, secs: i64) -> ObjectId {
        save(
            store,
            &Commit::with_timestamp(msg, at(secs), Some(parent), Snapshot::new()),
        )
    }

    fn merge(
        store: &InMemoryObjectStore,
        msg: &str,
        parent: ObjectId,
        alt: ObjectId,
        secs: i64,
    ) -> ObjectId {
        let mut commit = Commit::with_timestamp(msg, at(secs), Some(parent), Snapshot::new());
        commit.alt_parent = Some(alt);
        save(store, &commit)
    }

    /// root -> a -> b
    fn linear(store: &InMemoryObjectStore) -> (ObjectId, ObjectId, ObjectId) {
        let root = save(store, &Commit::initial("initial commit"));
        let a = child(store, "a", root, 10);
        let b = child(store, "b", a, 20);
        (root, a, b)
    }

    #[test]
    fn commit_lookup() {
        let store = InMemoryObjectStore::new();
        let (root, _, _) = linear(&store);
        let graph = CommitGraph::new(&store);
        assert_eq!(graph.commit(&root).unwrap().message, "initial commit");

        let missing = ObjectId::from_hash([0xee; 32]);
        assert!(matches!(
            graph.commit(&missing),
            Err(DagError::CommitNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn history_is_newest_first() {
        let store = InMemoryObjectStore::new();
        let (root, a, b) = linear(&store);
        let graph = CommitGraph::new(&store);
        let ids: Vec<ObjectId> = graph.history(&b).unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![b, a, root]);
    }

    #[test]
    fn history_follows_first_parent_only() {
        let store = InMemoryObjectStore::new();
        let (root, a, _) = linear(&store);
        let side = child(&store, "side", root, 15);
        let m = merge(&store, "merge", a, side, 30);

        let graph = CommitGraph::new(&store);
        let ids: Vec<ObjectId> = graph.history(&m).unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![m, a, root]);
        assert!(graph.ancestors(&m).unwrap().contains(&side));
    }

    #[test]
    fn ancestors_include_head() {
        let store = InMemoryObjectStore::new();
        let (root, a, b) = linear(&store);
        let set = CommitGraph::new(&store).ancestors(&a).unwrap();
        assert!(set.contains(&a));
        assert!(set.contains(&root));
        assert!(!set.contains(&b));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn split_point_of_descendant_is_ancestor() {
        let store = InMemoryObjectStore::new();
        let (_, a, b) = linear(&store);
        let graph = CommitGraph::new(&store);
        // Fast-forward case: current is behind given.
        assert_eq!(graph.split_point(&a, &b).unwrap(), a);
        // Already merged case: given is behind current.
        assert_eq!(graph.split_point(&b, &a).unwrap(), a);
    }

    #[test]
    fn split_point_of_diverged_branches() {
        let store = InMemoryObjectStore::new();
        let (_, a, b) = linear(&store);
        let c = child(&store, "c", a, 25);
        let graph = CommitGraph::new(&store);
        assert_eq!(graph.split_point(&b, &c).unwrap(), a);
    }

    #[test]
    fn split_point_prefers_first_parent_in_bfs_order() {
        let store = InMemoryObjectStore::new();
        let root = save(&store, &Commit::initial("initial commit"));
        let x = child(&store, "x", root, 10);
        let y = child(&store, "y", root, 11);
        let current = merge(&store, "current", x, y, 20);

        // Both x and y are common; the first parent of `given` wins.
        let given = merge(&store, "given", y, x, 21);
        let graph = CommitGraph::new(&store);
        assert_eq!(graph.split_point(&current, &given).unwrap(), y);

        let given_swapped = merge(&store, "given swapped", x, y, 22);
        assert_eq!(graph.split_point(&current, &given_swapped).unwrap(), x);
    }

    #[test]
    fn split_point_without_shared_root() {
        let store = InMemoryObjectStore::new();
        let (_, _, b) = linear(&store);
        let other_root = save(&store, &Commit::initial("another root"));
        let graph = CommitGraph::new(&store);
        assert!(matches!(
            graph.split_point(&b, &other_root),
            Err(DagError::NoCommonAncestor { .. })
        ));
    }

    #[test]
    fn all_commits_skips_blobs() {
        let store = InMemoryObjectStore::new();
        let (root, a, b) = linear(&store);
        store
            .save(&Blob::new("f", b"content".to_vec()).to_stored_object().unwrap())
            .unwrap();

        let commits = CommitGraph::new(&store).all_commits().unwrap();
        let mut expected = vec![root, a, b];
        expected.sort();
        let ids: Vec<ObjectId> = commits.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, expected);
    }
}
