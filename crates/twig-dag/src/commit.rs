use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use twig_store::{ObjectKind, StoreResult, StoredObject};
use twig_types::{ObjectId, Snapshot};

/// An immutable node of the history DAG.
///
/// The identity covers all five fields, so two commits with the same tree but
/// a different message, time or parentage are distinct objects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// First parent: the branch the commit was made on.
    pub parent: Option<ObjectId>,
    /// Second parent, set only on merge commits.
    pub alt_parent: Option<ObjectId>,
    /// Complete directory state at this commit.
    pub snapshot: Snapshot,
}

impl Commit {
    /// The root commit: no parents, empty tree, stamped at the Unix epoch.
    pub fn initial(message: impl Into<String>) -> Self {
        Self::with_timestamp(message, DateTime::<Utc>::UNIX_EPOCH, None, Snapshot::new())
    }

    /// A commit on top of `parent`, stamped now.
    pub fn new(message: impl Into<String>, parent: ObjectId, snapshot: Snapshot) -> Self {
        Self::with_timestamp(message, Utc::now(), Some(parent), snapshot)
    }

    /// A merge commit with `given` as its second parent, stamped now.
    pub fn merge(
        message: impl Into<String>,
        current: ObjectId,
        given: ObjectId,
        snapshot: Snapshot,
    ) -> Self {
        let mut commit = Self::new(message, current, snapshot);
        commit.alt_parent = Some(given);
        commit
    }

    pub fn with_timestamp(
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
        parent: Option<ObjectId>,
        snapshot: Snapshot,
    ) -> Self {
        Self {
            message: message.into(),
            timestamp,
            parent,
            alt_parent: None,
            snapshot,
        }
    }

    /// Returns `true` for the parentless root commit.
    pub fn is_root(&self) -> bool {
        self.parent.is_none() && self.alt_parent.is_none()
    }

    /// Returns `true` if this commit joined two histories.
    pub fn is_merge(&self) -> bool {
        self.alt_parent.is_some()
    }

    /// Parent ids in traversal order: first parent, then the merge parent.
    pub fn parents(&self) -> impl Iterator<Item = ObjectId> {
        self.parent.into_iter().chain(self.alt_parent)
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        StoredObject::encode(ObjectKind::Commit, self)
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.decode(ObjectKind::Commit)
    }

    /// The id this commit is stored under.
    pub fn id(&self) -> StoreResult<ObjectId> {
        Ok(self.to_stored_object()?.compute_id())
    }
}
