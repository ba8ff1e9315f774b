//! On-disk object store: one file per object under an `objects/` root.
//!
//! Each file is named by the object's full hex id and holds the bincode
//! encoding of its [`StoredObject`]. Writes go to a temporary file in the
//! same directory which is then renamed into place, so a valid key never
//! names a partially written object.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use twig_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Filesystem-backed object store.
#[derive(Clone, Debug)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory holding object files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.root.join(id.to_hex())
    }
}

impl ObjectStore for FsObjectStore {
    fn get(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let bytes = match fs::read(self.object_path(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let object: StoredObject =
            bincode::deserialize(&bytes).map_err(|e| StoreError::CorruptObject {
                id: *id,
                reason: e.to_string(),
            })?;
        let computed = object.compute_id();
        if computed != *id {
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        Ok(Some(object))
    }

    fn save(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        let path = self.object_path(&id);
        if path.exists() {
            return Ok(id);
        }

        let bytes =
            bincode::serialize(object).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut tmp = tempfile::Builder::new()
            .prefix(".tmp-")
            .tempfile_in(&self.root)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(id = %id.short_hex(), kind = %object.kind, size = bytes.len(), "wrote object");
        Ok(id)
    }

    fn contains(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }

    fn ids(&self) -> StoreResult<Vec<ObjectId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // Leftover temp files and anything else not named by an id.
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| ObjectId::from_hex(name).ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Blob, ObjectKind};

    fn temp_store() -> (tempfile::TempDir, FsObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path().join("objects")).unwrap();
        (dir, store)
    }

    fn make_blob(content: &[u8]) -> StoredObject {
        Blob::new("file.txt", content.to_vec())
            .to_stored_object()
            .unwrap()
    }

    #[test]
    fn save_writes_one_file_per_object() {
        let (_dir, store) = temp_store();
        let id = store.save(&make_blob(b"hello")).unwrap();
        assert!(store.root().join(id.to_hex()).is_file());
        assert_eq!(store.load(&id).unwrap(), make_blob(b"hello"));
    }

    #[test]
    fn save_twice_keeps_single_copy() {
        let (_dir, store) = temp_store();
        let obj = make_blob(b"twice");
        let id1 = store.save(&obj).unwrap();
        let id2 = store.save(&obj).unwrap();
        assert_eq!(id1, id2);
        assert_eq!(fs::read_dir(store.root()).unwrap().count(), 1);
    }

    #[test]
    fn existing_object_is_never_rewritten() {
        let (_dir, store) = temp_store();
        let obj = make_blob(b"immutable");
        let id = store.save(&obj).unwrap();
        let path = store.root().join(id.to_hex());
        let before = fs::read(&path).unwrap();
        let modified = fs::metadata(&path).unwrap().modified().unwrap();

        store.save(&obj).unwrap();
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn missing_object_reads_as_none() {
        let (_dir, store) = temp_store();
        let id = ObjectId::from_hash([3; 32]);
        assert!(store.get(&id).unwrap().is_none());
        assert!(!store.contains(&id).unwrap());
        assert!(matches!(store.load(&id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn garbage_bytes_are_corrupt() {
        let (_dir, store) = temp_store();
        let id = ObjectId::from_hash([4; 32]);
        fs::write(store.root().join(id.to_hex()), [0xff, 0xff]).unwrap();
        assert!(matches!(store.get(&id), Err(StoreError::CorruptObject { .. })));
    }

    #[test]
    fn tampered_object_fails_hash_check() {
        let (_dir, store) = temp_store();
        let id = store.save(&make_blob(b"original")).unwrap();
        let forged = bincode::serialize(&make_blob(b"forged")).unwrap();
        fs::write(store.root().join(id.to_hex()), forged).unwrap();
        assert!(matches!(
            store.get(&id),
            Err(StoreError::HashMismatch { id: bad, .. }) if bad == id
        ));
    }

    #[test]
    fn ids_skip_foreign_files() {
        let (_dir, store) = temp_store();
        let id = store.save(&make_blob(b"listed")).unwrap();
        fs::write(store.root().join(".tmp-leftover"), b"junk").unwrap();
        fs::write(store.root().join("README"), b"junk").unwrap();
        assert_eq!(store.ids().unwrap(), vec![id]);
    }

    #[test]
    fn resolve_prefix_scans_directory() {
        let (_dir, store) = temp_store();
        let id = store.save(&make_blob(b"prefixed")).unwrap();
        assert_eq!(store.resolve_prefix(&id.to_hex()[..10]).unwrap(), Some(id));
    }

    #[test]
    fn reopen_sees_previous_objects() {
        let (dir, store) = temp_store();
        let obj = StoredObject::new(ObjectKind::Commit, b"commit bytes".to_vec());
        let id = store.save(&obj).unwrap();
        drop(store);

        let reopened = FsObjectStore::open(dir.path().join("objects")).unwrap();
        assert_eq!(reopened.load(&id).unwrap(), obj);
    }
}
