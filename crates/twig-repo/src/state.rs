//! The mutable part of a repository: index, HEAD and branch table.
//!
//! Every operation loads the state once, mutates it in memory and persists it
//! at the end. Each file is replaced atomically by writing a temporary file
//! next to it and renaming it into place.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use twig_index::Index;
use twig_refs::{BranchTable, Head};
use twig_types::ObjectId;

use crate::error::{RepoError, RepoResult};
use crate::layout::RepoLayout;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryState {
    pub index: Index,
    pub head: Head,
    pub branches: BranchTable,
}

impl RepositoryState {
    /// Read all three state files. A missing file is repository corruption.
    pub fn load(layout: &RepoLayout) -> RepoResult<Self> {
        Ok(Self {
            index: read_state(&layout.index_path())?,
            head: read_state(&layout.head_path())?,
            branches: read_state(&layout.branches_path())?,
        })
    }

    pub fn persist(&self, layout: &RepoLayout) -> RepoResult<()> {
        write_state(&layout.index_path(), &self.index)?;
        write_state(&layout.head_path(), &self.head)?;
        write_state(&layout.branches_path(), &self.branches)?;
        debug!(
            branch = %self.head.branch,
            head = %self.head.commit.short_hex(),
            staged = self.index.len(),
            "persisted repository state"
        );
        Ok(())
    }

    /// Move HEAD and its branch to `commit`.
    pub fn advance(&mut self, commit: ObjectId) -> RepoResult<()> {
        self.branches.set(&self.head.branch, commit)?;
        self.head.advance(commit);
        Ok(())
    }
}

fn read_state<T: DeserializeOwned>(path: &Path) -> RepoResult<T> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(RepoError::MissingState(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    bincode::deserialize(&bytes).map_err(|e| RepoError::CorruptState {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn write_state<T: Serialize>(path: &Path, value: &T) -> RepoResult<()> {
    let bytes = bincode::serialize(value).map_err(|e| RepoError::Serialization(e.to_string()))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| RepoError::Io(e.error))?;
    Ok(())
}
