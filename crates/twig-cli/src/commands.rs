use std::path::{Path, PathBuf};

use colored::Colorize;
use serde_json::{json, Value};
use twig_repo::{AddOutcome, RemoveOutcome, RepoConfig, RepoError, Repository};

use crate::cli::*;
use crate::render;

/// Run one command. Refused operations print their message and succeed;
/// anything else that fails is returned to `main`.
pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let root = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let format = cli.format;

    let result = match cli.command {
        Command::Init(args) => cmd_init(&root, args, format),
        command => match Repository::open(root.as_path()) {
            Ok(repo) => dispatch(&repo, command, format),
            Err(e) => Err(e.into()),
        },
    };

    match result {
        Err(err) => match err.downcast_ref::<RepoError>() {
            Some(e) if e.is_user_error() => refuse(&e.to_string(), format),
            _ => Err(err),
        },
        ok => ok,
    }
}

fn dispatch(repo: &Repository, command: Command, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        Command::Init(_) => Err(RepoError::AlreadyInitialized.into()),
        Command::Add(args) => cmd_add(repo, args, format),
        Command::Rm(args) => cmd_rm(repo, args, format),
        Command::Commit(args) => cmd_commit(repo, args, format),
        Command::Checkout(args) => cmd_checkout(repo, args, format),
        Command::Branch(args) => {
            repo.branch(&args.name)?;
            emit(format, String::new(), json!({ "branch": args.name }))
        }
        Command::RmBranch(args) => {
            repo.remove_branch(&args.name)?;
            emit(format, String::new(), json!({ "removed_branch": args.name }))
        }
        Command::Reset(args) => {
            let id = repo.reset(&args.commit)?;
            emit(
                format,
                format!("HEAD is now at {}\n", id.short_hex().yellow()),
                json!({ "commit": id.to_hex() }),
            )
        }
        Command::Merge(args) => {
            let report = repo.merge(&args.name)?;
            emit(format, render::merge_text(&report), render::merge_json(&report))
        }
        Command::Log => {
            let entries = repo.log()?;
            emit(format, render::log_text(&entries), render::log_json(&entries))
        }
        Command::GlobalLog => {
            let entries = repo.global_log()?;
            emit(format, render::log_text(&entries), render::log_json(&entries))
        }
        Command::Find(args) => {
            let ids = repo.find(&args.message)?;
            emit(format, render::ids_text(&ids), render::ids_json(&ids))
        }
        Command::Status => {
            let status = repo.status()?;
            emit(format, render::status_text(&status), render::status_json(&status))
        }
    }
}

fn cmd_init(root: &Path, args: InitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut config = RepoConfig::default();
    if let Some(branch) = args.default_branch {
        config.default_branch = branch;
    }
    let repo = Repository::init(root.to_path_buf(), config)?;
    let head = repo.state()?.head;
    emit(
        format,
        format!(
            "Initialized empty twig repository in {}\n",
            repo.layout().dot_dir().display().to_string().bold()
        ),
        json!({
            "root": display_path(repo.root()),
            "branch": head.branch,
            "commit": head.commit.to_hex(),
        }),
    )
}

fn cmd_add(repo: &Repository, args: PathArgs, format: OutputFormat) -> anyhow::Result<()> {
    let outcome = repo.add(&args.path)?;
    let (label, blob) = match outcome {
        AddOutcome::Unchanged => ("unchanged", None),
        AddOutcome::Reverted => ("reverted", None),
        AddOutcome::Staged(id) => ("staged", Some(id.to_hex())),
    };
    emit(format, String::new(), json!({ "path": args.path, "result": label, "blob": blob }))
}

fn cmd_rm(repo: &Repository, args: PathArgs, format: OutputFormat) -> anyhow::Result<()> {
    let label = match repo.remove(&args.path)? {
        RemoveOutcome::Unstaged => "unstaged",
        RemoveOutcome::Untracked => "untracked",
    };
    emit(format, String::new(), json!({ "path": args.path, "result": label }))
}

fn cmd_commit(repo: &Repository, args: CommitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = repo.commit(&args.message)?;
    let branch = repo.state()?.head.branch;
    emit(
        format,
        format!("[{} {}] {}\n", branch.green(), id.short_hex().yellow(), args.message),
        json!({ "branch": branch, "commit": id.to_hex(), "message": args.message }),
    )
}

fn cmd_checkout(repo: &Repository, args: CheckoutArgs, format: OutputFormat) -> anyhow::Result<()> {
    match (args.target, args.path) {
        (Some(branch), None) => {
            repo.checkout_branch(&branch)?;
            emit(format, String::new(), json!({ "branch": branch }))
        }
        (None, Some(path)) => {
            repo.checkout_file(&path)?;
            emit(format, String::new(), json!({ "restored": path }))
        }
        (Some(commit), Some(path)) => {
            repo.checkout_file_at(&commit, &path)?;
            emit(format, String::new(), json!({ "restored": path, "from": commit }))
        }
        (None, None) => refuse("Incorrect operands.", format),
    }
}

fn display_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| PathBuf::from(path))
        .display()
        .to_string()
}

fn emit(format: OutputFormat, text: String, value: Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{text}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}

fn refuse(message: &str, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{message}"),
        OutputFormat::Json => println!("{}", json!({ "error": message })),
    }
    Ok(())
}
