//! The repository facade: one method per user-facing command.
//!
//! Every mutating operation follows the same shape. Load the state, run all
//! validation, then write objects, then working files, then the state
//! files. A refused operation therefore leaves the repository untouched.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;
use twig_dag::{Commit, CommitGraph};
use twig_index::{AddOutcome, Index, RemoveOutcome, WorkdirStatus};
use twig_merge::{MergeConflict, MergeEngine, MergeOutcome};
use twig_refs::{validate_branch_name, BranchTable, Head};
use twig_store::{Blob, FsObjectStore, ObjectKind, ObjectStore};
use twig_types::{ObjectId, Snapshot};

use crate::config::RepoConfig;
use crate::error::{RepoError, RepoResult};
use crate::layout::RepoLayout;
use crate::state::RepositoryState;
use crate::workdir::{FsWorkdir, Workdir};

/// One commit as shown by `log`, `global-log` and `find`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub id: ObjectId,
    /// `(parent, alt_parent)` for merge commits.
    pub merge_parents: Option<(ObjectId, ObjectId)>,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl LogEntry {
    pub fn from_commit(id: ObjectId, commit: &Commit) -> Self {
        Self {
            id,
            merge_parents: commit.parent.zip(commit.alt_parent),
            timestamp: commit.timestamp,
            message: commit.message.clone(),
        }
    }
}

/// Output of `status`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoStatus {
    pub current_branch: String,
    pub branches: Vec<String>,
    pub changes: WorkdirStatus,
}

/// What a `merge` did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeReport {
    /// The current branch moved forward to the given head.
    FastForwarded(ObjectId),
    /// The given branch is an ancestor of the current one.
    AlreadyMerged,
    /// A merge commit was created. Conflicted paths hold conflict blobs.
    Merged {
        commit: ObjectId,
        conflicts: Vec<MergeConflict>,
    },
}

/// A twig repository rooted at a working directory.
pub struct Repository {
    layout: RepoLayout,
    config: RepoConfig,
    store: FsObjectStore,
    workdir: FsWorkdir,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.layout.root())
            .field("config", &self.config)
            .finish()
    }
}

impl Repository {
    /// Create a repository in `root` with a root commit on the default
    /// branch.
    pub fn init(root: impl Into<PathBuf>, config: RepoConfig) -> RepoResult<Self> {
        let layout = RepoLayout::new(root);
        if layout.is_initialized() {
            return Err(RepoError::AlreadyInitialized);
        }
        validate_branch_name(&config.default_branch)?;

        fs::create_dir_all(layout.dot_dir())?;
        let store = FsObjectStore::open(layout.objects_dir())?;
        config.save(&layout.config_path())?;

        let root_commit = Commit::initial(config.initial_message.as_str());
        let root_id = store.save(&root_commit.to_stored_object()?)?;
        let state = RepositoryState {
            index: Index::new(),
            head: Head::new(config.default_branch.as_str(), root_id),
            branches: BranchTable::with_branch(config.default_branch.as_str(), root_id),
        };
        state.persist(&layout)?;

        info!(
            root = %layout.root().display(),
            branch = %config.default_branch,
            commit = %root_id.short_hex(),
            "initialized repository"
        );
        let workdir = FsWorkdir::new(layout.root());
        Ok(Self {
            layout,
            config,
            store,
            workdir,
        })
    }

    /// Open the repository whose working directory is `root`.
    pub fn open(root: impl Into<PathBuf>) -> RepoResult<Self> {
        let layout = RepoLayout::new(root);
        if !layout.is_initialized() {
            return Err(RepoError::NotInitialized);
        }
        let config = RepoConfig::load(&layout.config_path())?;
        let store = FsObjectStore::open(layout.objects_dir())?;
        let workdir = FsWorkdir::new(layout.root());
        Ok(Self {
            layout,
            config,
            store,
            workdir,
        })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn store(&self) -> &FsObjectStore {
        &self.store
    }

    /// Current index, HEAD and branch table.
    pub fn state(&self) -> RepoResult<RepositoryState> {
        RepositoryState::load(&self.layout)
    }

    /// Load a commit by full id.
    pub fn read_commit(&self, id: &ObjectId) -> RepoResult<Commit> {
        Ok(self.graph().commit(id)?)
    }

    // ---------------------------------------------------------------
    // Staging and committing
    // ---------------------------------------------------------------

    /// Stage the working version of `path`.
    pub fn add(&self, path: &str) -> RepoResult<AddOutcome> {
        let mut state = self.state()?;
        let content = self
            .workdir
            .read(path)?
            .ok_or_else(|| RepoError::FileNotFound(path.to_string()))?;
        let head = self.head_snapshot(&state)?;

        let outcome = state
            .index
            .add(&self.store, &Blob::new(path, content), &head)?;
        if outcome != AddOutcome::Unchanged {
            state.persist(&self.layout)?;
        }
        Ok(outcome)
    }

    /// Unstage `path`; if HEAD tracks it, also delete the working file.
    pub fn remove(&self, path: &str) -> RepoResult<RemoveOutcome> {
        let mut state = self.state()?;
        let head = self.head_snapshot(&state)?;

        let outcome = state.index.remove(path, &head)?;
        if outcome == RemoveOutcome::Untracked {
            self.workdir.delete(path)?;
        }
        state.persist(&self.layout)?;
        Ok(outcome)
    }

    /// Record the index as a new commit on the current branch.
    pub fn commit(&self, message: &str) -> RepoResult<ObjectId> {
        if message.trim().is_empty() {
            return Err(RepoError::EmptyMessage);
        }
        let mut state = self.state()?;
        let parent = state.head.commit;
        if state.index.matches(&self.head_snapshot(&state)?) {
            return Err(RepoError::NothingToCommit);
        }

        let commit = Commit::new(message, parent, state.index.snapshot().clone());
        let id = self.store.save(&commit.to_stored_object()?)?;
        state.advance(id)?;
        state.persist(&self.layout)?;

        info!(
            branch = %state.head.branch,
            commit = %id.short_hex(),
            files = commit.snapshot.len(),
            "committed"
        );
        Ok(id)
    }

    // ---------------------------------------------------------------
    // Branches, checkout and reset
    // ---------------------------------------------------------------

    /// Create a branch at the current commit. HEAD does not move.
    pub fn branch(&self, name: &str) -> RepoResult<()> {
        let mut state = self.state()?;
        state.branches.create(name, state.head.commit)?;
        state.persist(&self.layout)?;
        info!(branch = name, commit = %state.head.commit.short_hex(), "created branch");
        Ok(())
    }

    /// Delete a branch pointer. Its commits stay in the store.
    pub fn remove_branch(&self, name: &str) -> RepoResult<()> {
        let mut state = self.state()?;
        state.branches.delete(name, &state.head)?;
        state.persist(&self.layout)?;
        info!(branch = name, "removed branch");
        Ok(())
    }

    /// Switch to another branch, replacing the working files with its head.
    pub fn checkout_branch(&self, name: &str) -> RepoResult<()> {
        let mut state = self.state()?;
        if state.head.branch == name {
            return Err(RepoError::CheckoutCurrentBranch);
        }
        let target_id = state
            .branches
            .get(name)
            .ok_or_else(|| RepoError::NoSuchBranch(name.to_string()))?;
        self.ensure_no_untracked(&state)?;

        let target = self.graph().commit(&target_id)?;
        self.restore(&state, &target.snapshot)?;
        state.index.reset_to(&target.snapshot);
        state.head.switch(name, target_id);
        state.persist(&self.layout)?;

        info!(branch = name, commit = %target_id.short_hex(), "checked out branch");
        Ok(())
    }

    /// Overwrite the working file with its version at HEAD.
    pub fn checkout_file(&self, path: &str) -> RepoResult<()> {
        let state = self.state()?;
        let commit = self.graph().commit(&state.head.commit)?;
        self.restore_file(&commit, path)
    }

    /// Overwrite the working file with its version at the (possibly
    /// abbreviated) commit `rev`.
    pub fn checkout_file_at(&self, rev: &str, path: &str) -> RepoResult<()> {
        let (_, commit) = self.resolve_commit(rev)?;
        self.restore_file(&commit, path)
    }

    /// Move the current branch to `rev` and check it out.
    pub fn reset(&self, rev: &str) -> RepoResult<ObjectId> {
        let mut state = self.state()?;
        let (id, commit) = self.resolve_commit(rev)?;
        self.ensure_no_untracked(&state)?;

        self.restore(&state, &commit.snapshot)?;
        state.index.reset_to(&commit.snapshot);
        state.advance(id)?;
        state.persist(&self.layout)?;

        info!(branch = %state.head.branch, commit = %id.short_hex(), "reset");
        Ok(id)
    }

    // ---------------------------------------------------------------
    // Merge
    // ---------------------------------------------------------------

    /// Merge the head of `branch` into the current branch.
    pub fn merge(&self, branch: &str) -> RepoResult<MergeReport> {
        let mut state = self.state()?;
        if state.head.branch == branch {
            return Err(RepoError::MergeWithSelf);
        }
        let given = state
            .branches
            .get(branch)
            .ok_or_else(|| RepoError::BranchNotFound(branch.to_string()))?;
        self.ensure_no_untracked(&state)?;
        if !state.index.matches(&self.head_snapshot(&state)?) {
            return Err(RepoError::UncommittedChanges);
        }

        let current = state.head.commit;
        match MergeEngine::new(&self.store).merge(&current, &given)? {
            MergeOutcome::AlreadyMerged => Ok(MergeReport::AlreadyMerged),
            MergeOutcome::FastForward(target) => {
                let snapshot = self.graph().commit(&target)?.snapshot;
                self.restore(&state, &snapshot)?;
                state.index.reset_to(&snapshot);
                state.advance(target)?;
                state.persist(&self.layout)?;
                info!(
                    branch = %state.head.branch,
                    commit = %target.short_hex(),
                    "fast-forwarded"
                );
                Ok(MergeReport::FastForwarded(target))
            }
            MergeOutcome::Merged(plan) => {
                let message = format!("Merged {branch} into {}.", state.head.branch);
                let commit = Commit::merge(message, current, given, plan.snapshot.clone());
                let id = self.store.save(&commit.to_stored_object()?)?;

                self.restore(&state, &plan.snapshot)?;
                state.index.reset_to(&plan.snapshot);
                state.advance(id)?;
                state.persist(&self.layout)?;

                info!(
                    given = branch,
                    into = %state.head.branch,
                    commit = %id.short_hex(),
                    conflicts = plan.conflicts.len(),
                    "merged"
                );
                Ok(MergeReport::Merged {
                    commit: id,
                    conflicts: plan.conflicts,
                })
            }
        }
    }

    // ---------------------------------------------------------------
    // Reporting
    // ---------------------------------------------------------------

    /// First-parent history from HEAD, newest first.
    pub fn log(&self) -> RepoResult<Vec<LogEntry>> {
        let state = self.state()?;
        Ok(self
            .graph()
            .history(&state.head.commit)?
            .iter()
            .map(|(id, commit)| LogEntry::from_commit(*id, commit))
            .collect())
    }

    /// Every commit in the store, in id order.
    pub fn global_log(&self) -> RepoResult<Vec<LogEntry>> {
        Ok(self
            .graph()
            .all_commits()?
            .iter()
            .map(|(id, commit)| LogEntry::from_commit(*id, commit))
            .collect())
    }

    /// Ids of every commit whose message is exactly `message`.
    pub fn find(&self, message: &str) -> RepoResult<Vec<ObjectId>> {
        let ids: Vec<ObjectId> = self
            .graph()
            .all_commits()?
            .into_iter()
            .filter(|(_, commit)| commit.message == message)
            .map(|(id, _)| id)
            .collect();
        if ids.is_empty() {
            return Err(RepoError::NoCommitWithMessage);
        }
        Ok(ids)
    }

    pub fn status(&self) -> RepoResult<RepoStatus> {
        let state = self.state()?;
        let head = self.head_snapshot(&state)?;

        let mut working = BTreeMap::new();
        for path in self.workdir.files()? {
            if let Some(content) = self.workdir.read(&path)? {
                let id = Blob::new(path.as_str(), content).id()?;
                working.insert(path, id);
            }
        }

        Ok(RepoStatus {
            current_branch: state.head.branch.clone(),
            branches: state.branches.names().map(str::to_string).collect(),
            changes: WorkdirStatus::compute(&state.index, &head, &working),
        })
    }

    // ---------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------

    fn graph(&self) -> CommitGraph<'_, FsObjectStore> {
        CommitGraph::new(&self.store)
    }

    fn head_snapshot(&self, state: &RepositoryState) -> RepoResult<Snapshot> {
        Ok(self.graph().commit(&state.head.commit)?.snapshot)
    }

    /// Resolve an abbreviated id that must name a commit.
    fn resolve_commit(&self, rev: &str) -> RepoResult<(ObjectId, Commit)> {
        let no_such = || RepoError::NoSuchCommit(rev.to_string());
        let id = self.store.resolve_prefix(rev)?.ok_or_else(no_such)?;
        let obj = self.store.load(&id)?;
        if obj.kind != ObjectKind::Commit {
            return Err(no_such());
        }
        Ok((id, Commit::from_stored_object(&obj)?))
    }

    fn ensure_no_untracked(&self, state: &RepositoryState) -> RepoResult<()> {
        if self
            .workdir
            .files()?
            .iter()
            .any(|path| !state.index.contains(path))
        {
            return Err(RepoError::UntrackedFileInTheWay);
        }
        Ok(())
    }

    fn read_blob(&self, id: &ObjectId) -> RepoResult<Vec<u8>> {
        Ok(Blob::from_stored_object(&self.store.load(id)?)?.content)
    }

    fn restore_file(&self, commit: &Commit, path: &str) -> RepoResult<()> {
        let id = commit
            .snapshot
            .get(path)
            .ok_or_else(|| RepoError::FileNotInCommit(path.to_string()))?;
        let content = self.read_blob(&id)?;
        self.workdir.write(path, &content)
    }

    /// Make the working directory match `target`.
    ///
    /// All blobs are read before the first file is touched.
    fn restore(&self, state: &RepositoryState, target: &Snapshot) -> RepoResult<()> {
        let mut contents = Vec::with_capacity(target.len());
        for (path, id) in target {
            contents.push((path.as_str(), self.read_blob(id)?));
        }

        for path in state.index.paths() {
            if !target.contains(path) {
                self.workdir.delete(path)?;
            }
        }
        for (path, content) in contents {
            self.workdir.write(path, &content)?;
        }
        Ok(())
    }
}
