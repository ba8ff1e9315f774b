use std::path::{Path, PathBuf};

/// Name of the metadata directory at the repository root.
pub const DOT_DIR: &str = ".twig";

/// Paths of everything a repository keeps under `<root>/.twig/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The working directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dot_dir(&self) -> PathBuf {
        self.root.join(DOT_DIR)
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.dot_dir().join("objects")
    }

    pub fn index_path(&self) -> PathBuf {
        self.dot_dir().join("index")
    }

    pub fn head_path(&self) -> PathBuf {
        self.dot_dir().join("head")
    }

    pub fn branches_path(&self) -> PathBuf {
        self.dot_dir().join("branches")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dot_dir().join("config.toml")
    }

    pub fn is_initialized(&self) -> bool {
        self.dot_dir().is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_dot_dir() {
        let layout = RepoLayout::new("/work");
        assert_eq!(layout.dot_dir(), PathBuf::from("/work/.twig"));
        assert_eq!(layout.objects_dir(), PathBuf::from("/work/.twig/objects"));
        assert_eq!(layout.head_path(), PathBuf::from("/work/.twig/head"));
        assert_eq!(layout.config_path(), PathBuf::from("/work/.twig/config.toml"));
    }

    #[test]
    fn fresh_directory_is_not_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let layout = RepoLayout::new(dir.path());
        assert!(!layout.is_initialized());
        std::fs::create_dir(layout.dot_dir()).unwrap();
        assert!(layout.is_initialized());
    }
}
