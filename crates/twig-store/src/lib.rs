//! Content-addressed object storage for twig.
//!
//! Blobs (file snapshots) and commits are stored as immutable objects keyed
//! by the BLAKE3 hash of their canonical encoding, domain-separated by
//! object kind.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsObjectStore`] -- one file per object under `objects/<hex>`
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Saving an object that already exists is a no-op, never an error.
//! 3. Objects are written before any pointer that references them.
//! 4. The store never deletes.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{Blob, ObjectKind, StoredObject};
pub use traits::ObjectStore;
