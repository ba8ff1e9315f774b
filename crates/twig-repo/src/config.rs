use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RepoError, RepoResult};

/// Per-repository settings, stored as `.twig/config.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Branch created by `init`.
    pub default_branch: String,
    /// Message of the root commit.
    pub initial_message: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            default_branch: "master".into(),
            initial_message: "initial commit".into(),
        }
    }
}

impl RepoConfig {
    /// Read the config file, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> RepoResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).map_err(|e| RepoError::Config(e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> RepoResult<()> {
        let text = toml::to_string_pretty(self).map_err(|e| RepoError::Config(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }
}
