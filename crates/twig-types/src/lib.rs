//! Foundation types for twig.
//!
//! Every other twig crate depends on `twig-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`]: Content-addressed identifier (BLAKE3 hash)
//! - [`ContentHasher`]: Domain-separated hasher producing [`ObjectId`]s
//! - [`Snapshot`]: Copy-on-write `path -> blob` mapping shared between
//!   commits and the staging index

pub mod error;
pub mod hasher;
pub mod object;
pub mod snapshot;

pub use error::TypeError;
pub use hasher::ContentHasher;
pub use object::ObjectId;
pub use snapshot::Snapshot;
