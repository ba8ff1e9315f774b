//! Copy-on-write directory snapshots.
//!
//! A [`Snapshot`] maps every tracked path to the id of its blob. Commits and
//! the staging index both hold snapshots; cloning one is a reference-count
//! bump, and the underlying map is only copied when a shared snapshot is
//! mutated. A commit's snapshot can therefore never be changed through the
//! index that produced it.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::object::ObjectId;

/// Ordered `path -> blob id` mapping with structural sharing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Arc<BTreeMap<String, ObjectId>>,
}

impl Snapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no paths are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Blob id tracked at `path`.
    pub fn get(&self, path: &str) -> Option<ObjectId> {
        self.entries.get(path).copied()
    }

    /// Returns `true` if `path` is tracked.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Track `path` at `id`, returning the previous id.
    pub fn insert(&mut self, path: impl Into<String>, id: ObjectId) -> Option<ObjectId> {
        Arc::make_mut(&mut self.entries).insert(path.into(), id)
    }

    /// Stop tracking `path`, returning its id.
    pub fn remove(&mut self, path: &str) -> Option<ObjectId> {
        // Avoid a copy when there is nothing to remove.
        if !self.entries.contains_key(path) {
            return None;
        }
        Arc::make_mut(&mut self.entries).remove(path)
    }

    /// Iterate entries in path order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ObjectId> {
        self.entries.iter()
    }

    /// Iterate tracked paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns `true` if both snapshots share the same underlying storage.
    pub fn shares_storage_with(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Structural equality: same size and every path maps to the same id.
    ///
    /// Short-circuits when both snapshots share storage.
    pub fn same_entries(&self, other: &Snapshot) -> bool {
        self.shares_storage_with(other) || self.entries == other.entries
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl From<BTreeMap<String, ObjectId>> for Snapshot {
    fn from(entries: BTreeMap<String, ObjectId>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }
}

impl FromIterator<(String, ObjectId)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, ObjectId)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<BTreeMap<_, _>>())
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a String, &'a ObjectId);
    type IntoIter = btree_map::Iter<'a, String, ObjectId>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Encoded exactly like the plain map so the canonical bytes of a commit do
// not depend on how its snapshot is shared in memory.
impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, ObjectId>::deserialize(deserializer).map(Self::from)
    }
}
