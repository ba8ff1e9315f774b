//! Access to the user's files.
//!
//! Paths are relative, `/`-separated strings. The metadata directory is
//! invisible through this interface.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{RepoError, RepoResult};
use crate::layout::DOT_DIR;

/// The working directory as seen by repository operations.
pub trait Workdir {
    /// Content of the file at `path`, or `None` if there is no such file.
    fn read(&self, path: &str) -> RepoResult<Option<Vec<u8>>>;

    /// Create or replace a file, creating parent directories as needed.
    fn write(&self, path: &str, content: &[u8]) -> RepoResult<()>;

    /// Delete a file. Deleting a missing file is not an error.
    fn delete(&self, path: &str) -> RepoResult<()>;

    /// Every file, recursively, sorted.
    fn files(&self) -> RepoResult<Vec<String>>;
}

/// [`Workdir`] over a directory on disk.
#[derive(Clone, Debug)]
pub struct FsWorkdir {
    root: PathBuf,
}

impl FsWorkdir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a repository path onto the filesystem, refusing anything that
    /// would leave the root or reach into the metadata directory.
    fn resolve(&self, path: &str) -> RepoResult<PathBuf> {
        let relative = Path::new(path);
        let mut components = relative.components().peekable();
        if components.peek().is_none() {
            return Err(RepoError::InvalidPath(path.to_string()));
        }
        for (i, component) in components.enumerate() {
            match component {
                Component::Normal(name) if !(i == 0 && name == DOT_DIR) => {}
                _ => return Err(RepoError::InvalidPath(path.to_string())),
            }
        }
        Ok(self.root.join(relative))
    }

    fn prune_empty_parents(&self, file: &Path) -> RepoResult<()> {
        let mut dir = file.parent();
        while let Some(current) = dir {
            if current == self.root || !current.starts_with(&self.root) {
                break;
            }
            if fs::read_dir(current)?.next().is_some() {
                break;
            }
            fs::remove_dir(current)?;
            dir = current.parent();
        }
        Ok(())
    }
}

impl Workdir for FsWorkdir {
    fn read(&self, path: &str) -> RepoResult<Option<Vec<u8>>> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Ok(None);
        }
        match fs::read(&full) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, path: &str, content: &[u8]) -> RepoResult<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)?;
        Ok(())
    }

    /// Also removes parent directories left empty, stopping at the root.
    fn delete(&self, path: &str) -> RepoResult<()> {
        let full = self.resolve(path)?;
        match fs::remove_file(&full) {
            Ok(()) => self.prune_empty_parents(&full),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn files(&self) -> RepoResult<Vec<String>> {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !(entry.depth() == 1 && entry.file_name() == DOT_DIR));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            let parts: Option<Vec<&str>> =
                relative.components().map(|c| c.as_os_str().to_str()).collect();
            match parts {
                Some(parts) => files.push(parts.join("/")),
                None => warn!(path = %entry.path().display(), "skipping non UTF-8 file name"),
            }
        }
        files.sort();
        Ok(files)
    }
}
