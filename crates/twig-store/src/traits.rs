use twig_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. The same encoded object always
///   produces the same id.
/// - `save` of an id that is already present is a no-op.
/// - Objects are never deleted.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its id.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn get(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Write an object if absent and return its content-addressed id.
    fn save(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn contains(&self, id: &ObjectId) -> StoreResult<bool>;

    /// All stored ids, sorted.
    fn ids(&self) -> StoreResult<Vec<ObjectId>>;

    /// Read an object that must exist.
    fn load(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        self.get(id)?.ok_or(StoreError::NotFound(*id))
    }

    /// Resolve an abbreviated hex id.
    ///
    /// Scans every stored id and returns the one whose hex form starts with
    /// `prefix`. Returns `Ok(None)` when nothing matches or when the prefix
    /// is ambiguous.
    fn resolve_prefix(&self, prefix: &str) -> StoreResult<Option<ObjectId>> {
        if let Ok(id) = ObjectId::from_hex(prefix) {
            return Ok(self.contains(&id)?.then_some(id));
        }
        let mut found = None;
        for id in self.ids()? {
            if id.matches_prefix(prefix) {
                if found.is_some() {
                    return Ok(None);
                }
                found = Some(id);
            }
        }
        Ok(found)
    }
}
