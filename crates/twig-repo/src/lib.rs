//! Repository facade for twig.
//!
//! Ties the object store, commit graph, refs, staging index and merge engine
//! to an on-disk layout:
//!
//! ```text
//! <root>/
//!   .twig/
//!     objects/<hex>   one encoded object per blob or commit
//!     index           staged snapshot
//!     head            (branch, commit)
//!     branches        branch name -> commit
//!     config.toml     RepoConfig
//!   ...               working files
//! ```
//!
//! [`Repository`] exposes one method per command. User errors are reported
//! through [`RepoError`] before anything is written; see
//! [`RepoError::is_user_error`].

pub mod config;
pub mod error;
pub mod layout;
pub mod repository;
pub mod state;
pub mod workdir;

pub use config::RepoConfig;
pub use error::{RepoError, RepoResult};
pub use layout::{RepoLayout, DOT_DIR};
pub use repository::{LogEntry, MergeReport, RepoStatus, Repository};
pub use state::RepositoryState;
pub use workdir::{FsWorkdir, Workdir};

pub use twig_index::{AddOutcome, FileStatus, RemoveOutcome, StatusEntry, WorkdirStatus};
pub use twig_merge::{ConflictKind, MergeConflict};
pub use twig_types::ObjectId;
