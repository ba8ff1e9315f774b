//! End-to-end scenarios against a repository on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use twig_repo::{MergeReport, ObjectId, RepoConfig, RepoError, Repository};

fn setup() -> anyhow::Result<(TempDir, Repository)> {
    let dir = TempDir::new()?;
    let repo = Repository::init(dir.path(), RepoConfig::default())?;
    Ok((dir, repo))
}

fn write(repo: &Repository, path: &str, content: &str) -> anyhow::Result<()> {
    fs::write(repo.root().join(path), content)?;
    Ok(())
}

fn read(repo: &Repository, path: &str) -> Option<String> {
    fs::read_to_string(repo.root().join(path)).ok()
}

fn commit(repo: &Repository, files: &[(&str, &str)], message: &str) -> anyhow::Result<ObjectId> {
    for (path, content) in files {
        write(repo, path, content)?;
        repo.add(path)?;
    }
    Ok(repo.commit(message)?)
}

fn snapshot_files(dir: &Path) -> anyhow::Result<BTreeMap<String, Vec<u8>>> {
    let mut files = BTreeMap::new();
    for name in ["index", "head", "branches"] {
        files.insert(name.to_string(), fs::read(dir.join(".twig").join(name))?);
    }
    Ok(files)
}

#[test]
fn test_two_commits_and_log() -> anyhow::Result<()> {
    let (_dir, repo) = setup()?;
    let root = repo.state()?.head.commit;

    let first = commit(&repo, &[("a.txt", "x")], "first")?;
    let second = commit(&repo, &[("a.txt", "y")], "second")?;

    let log = repo.log()?;
    let messages: Vec<&str> = log.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["second", "first", "initial commit"]);
    assert_eq!(
        log.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![second, first, root]
    );

    let a_first = repo.read_commit(&first)?.snapshot.get("a.txt");
    let a_second = repo.read_commit(&second)?.snapshot.get("a.txt");
    assert!(a_first.is_some());
    assert_ne!(a_first, a_second);
    Ok(())
}

#[test]
fn test_objects_are_never_rewritten() -> anyhow::Result<()> {
    let (dir, repo) = setup()?;
    commit(&repo, &[("a.txt", "x")], "first")?;

    let objects = dir.path().join(".twig/objects");
    let before: BTreeMap<_, _> = fs::read_dir(&objects)?
        .map(|e| {
            let e = e.unwrap();
            (e.file_name(), fs::read(e.path()).unwrap())
        })
        .collect();

    repo.branch("dev")?;
    commit(&repo, &[("a.txt", "y"), ("b.txt", "b")], "second")?;
    repo.checkout_branch("dev")?;
    repo.checkout_branch("master")?;

    for (name, bytes) in &before {
        assert_eq!(&fs::read(objects.join(name))?, bytes);
    }
    Ok(())
}

#[test]
fn test_refused_operations_leave_state_untouched() -> anyhow::Result<()> {
    let (dir, repo) = setup()?;
    commit(&repo, &[("a.txt", "x")], "first")?;
    repo.branch("dev")?;
    let before = snapshot_files(dir.path())?;

    assert!(matches!(repo.commit("again"), Err(RepoError::NothingToCommit)));
    assert!(matches!(repo.branch("dev"), Err(RepoError::BranchExists(_))));
    assert!(matches!(repo.remove("ghost.txt"), Err(RepoError::NothingToRemove(_))));
    assert!(matches!(repo.merge("master"), Err(RepoError::MergeWithSelf)));
    assert!(matches!(repo.reset("ffffffff"), Err(RepoError::NoSuchCommit(_))));

    write(&repo, "a.txt", "dirty")?;
    repo.add("a.txt")?;
    let staged = snapshot_files(dir.path())?;
    assert!(matches!(repo.merge("dev"), Err(RepoError::UncommittedChanges)));
    assert_eq!(snapshot_files(dir.path())?, staged);

    write(&repo, "stray.txt", "s")?;
    assert!(matches!(repo.checkout_branch("dev"), Err(RepoError::UntrackedFileInTheWay)));
    assert!(matches!(repo.merge("dev"), Err(RepoError::UntrackedFileInTheWay)));
    assert_eq!(snapshot_files(dir.path())?, staged);
    assert_ne!(staged, before);
    Ok(())
}

#[test]
fn test_merge_fast_forward() -> anyhow::Result<()> {
    let (_dir, repo) = setup()?;
    repo.branch("feature")?;
    repo.checkout_branch("feature")?;
    let tip = commit(&repo, &[("f.txt", "feature work")], "feature commit")?;
    repo.checkout_branch("master")?;
    assert_eq!(read(&repo, "f.txt"), None);

    let commits_before = repo.global_log()?.len();
    assert_eq!(repo.merge("feature")?, MergeReport::FastForwarded(tip));
    assert_eq!(repo.global_log()?.len(), commits_before);

    let state = repo.state()?;
    assert_eq!(state.head.commit, tip);
    assert_eq!(state.branches.get("master"), Some(tip));
    assert_eq!(read(&repo, "f.txt").as_deref(), Some("feature work"));
    Ok(())
}

#[test]
fn test_fast_forward_turns_file_into_directory() -> anyhow::Result<()> {
    let (dir, repo) = setup()?;
    let base = commit(&repo, &[("docs", "one file")], "docs as a file")?;
    repo.branch("restructure")?;
    repo.checkout_branch("restructure")?;
    repo.remove("docs")?;
    fs::create_dir_all(dir.path().join("docs"))?;
    let tip = commit(&repo, &[("docs/index.md", "# index")], "docs as a directory")?;
    repo.checkout_branch("master")?;
    assert_eq!(read(&repo, "docs").as_deref(), Some("one file"));

    assert_eq!(repo.merge("restructure")?, MergeReport::FastForwarded(tip));
    assert_eq!(read(&repo, "docs/index.md").as_deref(), Some("# index"));

    repo.reset(&base.to_hex())?;
    assert_eq!(read(&repo, "docs").as_deref(), Some("one file"));
    assert_eq!(repo.state()?.head.commit, base);
    assert!(repo.status()?.changes.is_clean());
    Ok(())
}

#[test]
fn test_merge_of_ancestor_is_noop() -> anyhow::Result<()> {
    let (_dir, repo) = setup()?;
    repo.branch("old")?;
    let tip = commit(&repo, &[("a.txt", "x")], "ahead")?;

    assert_eq!(repo.merge("old")?, MergeReport::AlreadyMerged);
    assert_eq!(repo.state()?.head.commit, tip);
    Ok(())
}

#[test]
fn test_three_way_merge_without_conflicts() -> anyhow::Result<()> {
    let (_dir, repo) = setup()?;
    commit(
        &repo,
        &[("keep.txt", "k"), ("theirs.txt", "A"), ("doomed.txt", "d")],
        "base",
    )?;
    repo.branch("other")?;

    commit(&repo, &[("ours.txt", "mine")], "master work")?;

    repo.checkout_branch("other")?;
    write(&repo, "theirs.txt", "B")?;
    repo.add("theirs.txt")?;
    repo.remove("doomed.txt")?;
    repo.commit("other work")?;
    repo.checkout_branch("master")?;

    let MergeReport::Merged { commit, conflicts } = repo.merge("other")? else {
        panic!("expected a merge commit");
    };
    assert!(conflicts.is_empty());

    let merged = repo.read_commit(&commit)?;
    assert_eq!(merged.message, "Merged other into master.");
    assert!(merged.is_merge());
    assert_eq!(read(&repo, "keep.txt").as_deref(), Some("k"));
    assert_eq!(read(&repo, "ours.txt").as_deref(), Some("mine"));
    assert_eq!(read(&repo, "theirs.txt").as_deref(), Some("B"));
    assert_eq!(read(&repo, "doomed.txt"), None);
    assert!(!merged.snapshot.contains("doomed.txt"));

    let log = repo.log()?;
    assert_eq!(log[0].id, commit);
    assert!(log[0].merge_parents.is_some());
    assert!(repo.status()?.changes.is_clean());
    Ok(())
}

#[test]
fn test_merge_conflict_writes_markers() -> anyhow::Result<()> {
    let (_dir, repo) = setup()?;
    commit(&repo, &[("f.txt", "A\n")], "base")?;
    repo.branch("other")?;
    commit(&repo, &[("f.txt", "B\n")], "ours")?;
    repo.checkout_branch("other")?;
    commit(&repo, &[("f.txt", "C\n")], "theirs")?;
    repo.checkout_branch("master")?;

    let MergeReport::Merged { commit, conflicts } = repo.merge("other")? else {
        panic!("expected a merge commit");
    };
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].path, "f.txt");
    assert_eq!(
        read(&repo, "f.txt").as_deref(),
        Some("<<<<<<< HEAD\nB\n=======\nC\n>>>>>>>")
    );
    assert_eq!(repo.state()?.head.commit, commit);
    Ok(())
}

#[test]
fn test_reopen_sees_same_history() -> anyhow::Result<()> {
    let (dir, repo) = setup()?;
    let id = commit(&repo, &[("a.txt", "x")], "persisted")?;
    drop(repo);

    let reopened = Repository::open(dir.path())?;
    assert_eq!(reopened.state()?.head.commit, id);
    assert_eq!(reopened.find("persisted")?, vec![id]);
    Ok(())
}
