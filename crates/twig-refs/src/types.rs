//! HEAD and the branch table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use twig_types::ObjectId;

use crate::error::{RefError, Result};
use crate::names::validate_branch_name;

/// The checked-out branch and the commit it points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    pub branch: String,
    pub commit: ObjectId,
}

impl Head {
    pub fn new(branch: impl Into<String>, commit: ObjectId) -> Self {
        Self {
            branch: branch.into(),
            commit,
        }
    }

    /// Move to a new commit on the same branch.
    pub fn advance(&mut self, commit: ObjectId) {
        self.commit = commit;
    }

    /// Check out another branch.
    pub fn switch(&mut self, branch: impl Into<String>, commit: ObjectId) {
        self.branch = branch.into();
        self.commit = commit;
    }
}

/// Ordered map of branch name to commit id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchTable {
    branches: BTreeMap<String, ObjectId>,
}

impl BranchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding a single branch, as created by `init`.
    pub fn with_branch(name: impl Into<String>, commit: ObjectId) -> Self {
        let mut branches = BTreeMap::new();
        branches.insert(name.into(), commit);
        Self { branches }
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<ObjectId> {
        self.branches.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.branches.contains_key(name)
    }

    /// Validate `name` and add a new branch at `commit`.
    pub fn create(&mut self, name: &str, commit: ObjectId) -> Result<()> {
        validate_branch_name(name)?;
        if self.branches.contains_key(name) {
            return Err(RefError::AlreadyExists {
                name: name.to_string(),
            });
        }
        self.branches.insert(name.to_string(), commit);
        Ok(())
    }

    /// Point an existing branch at `commit`.
    pub fn set(&mut self, name: &str, commit: ObjectId) -> Result<()> {
        match self.branches.get_mut(name) {
            Some(target) => {
                *target = commit;
                Ok(())
            }
            None => Err(RefError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Delete a branch pointer, refusing to delete the one HEAD names.
    ///
    /// The commits it pointed at are untouched.
    pub fn delete(&mut self, name: &str, head: &Head) -> Result<ObjectId> {
        if head.branch == name {
            return Err(RefError::DeleteCurrentBranch {
                name: name.to_string(),
            });
        }
        self.branches.remove(name).ok_or_else(|| RefError::NotFound {
            name: name.to_string(),
        })
    }

    /// Branch names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.branches.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ObjectId)> {
        self.branches.iter().map(|(name, id)| (name.as_str(), *id))
    }
}
