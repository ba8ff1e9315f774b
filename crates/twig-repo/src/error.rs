use std::path::PathBuf;

use thiserror::Error;
use twig_dag::DagError;
use twig_index::IndexError;
use twig_merge::MergeError;
use twig_refs::RefError;
use twig_store::StoreError;

/// Errors returned by repository operations.
///
/// The first group are user errors: the operation was refused before
/// anything was written, and the message is meant to be shown as is. The
/// rest are fatal and indicate I/O failure or a corrupt repository.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not in an initialized Twig directory.")]
    NotInitialized,

    #[error("A Twig version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("File does not exist.")]
    FileNotFound(String),

    #[error("No reason to remove the file.")]
    NothingToRemove(String),

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("A branch with that name already exists.")]
    BranchExists(String),

    #[error("A branch with that name does not exist.")]
    BranchNotFound(String),

    #[error("No such branch exists.")]
    NoSuchBranch(String),

    #[error("No need to checkout the current branch.")]
    CheckoutCurrentBranch,

    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,

    #[error("Invalid branch name {name:?}: {reason}.")]
    InvalidBranchName { name: String, reason: String },

    #[error("File does not exist in that commit.")]
    FileNotInCommit(String),

    #[error("No commit with that id exists.")]
    NoSuchCommit(String),

    #[error("Found no commit with that message.")]
    NoCommitWithMessage,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay,

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,

    #[error("Invalid path {0:?}.")]
    InvalidPath(String),

    // Fatal errors.
    #[error("missing repository state file: {}", .0.display())]
    MissingState(PathBuf),

    #[error("corrupt repository state file {}: {reason}", .path.display())]
    CorruptState { path: PathBuf, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("history error: {0}")]
    Dag(#[from] DagError),

    #[error("merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RepoError {
    /// Returns `true` if the operation was refused without changing anything.
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::MissingState(_)
                | Self::CorruptState { .. }
                | Self::Config(_)
                | Self::Serialization(_)
                | Self::Store(_)
                | Self::Dag(_)
                | Self::Merge(_)
                | Self::Io(_)
        )
    }
}

impl From<IndexError> for RepoError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::NothingToRemove(path) => Self::NothingToRemove(path),
            IndexError::InvalidPath(path) => Self::InvalidPath(path),
            IndexError::Store(e) => Self::Store(e),
        }
    }
}

impl From<RefError> for RepoError {
    fn from(err: RefError) -> Self {
        match err {
            RefError::NotFound { name } => Self::BranchNotFound(name),
            RefError::AlreadyExists { name } => Self::BranchExists(name),
            RefError::InvalidBranchName { name, reason } => {
                Self::InvalidBranchName { name, reason }
            }
            RefError::DeleteCurrentBranch { .. } => Self::RemoveCurrentBranch,
        }
    }
}

/// Convenience alias for repository results.
pub type RepoResult<T> = Result<T, RepoError>;
