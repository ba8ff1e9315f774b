use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "twig", about = "A small local version-control system", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log repository activity at debug level to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Run as if twig was started in this directory
    #[arg(short = 'C', global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a repository in the current directory
    Init(InitArgs),
    /// Stage a file for the next commit
    Add(PathArgs),
    /// Unstage a file, deleting it if the current commit tracks it
    Rm(PathArgs),
    /// Record the staged files as a new commit
    Commit(CommitArgs),
    /// Switch branches or restore a file from a commit
    Checkout(CheckoutArgs),
    /// Create a branch at the current commit
    Branch(BranchArgs),
    /// Delete a branch pointer
    #[command(name = "rm-branch")]
    RmBranch(BranchArgs),
    /// Move the current branch to a commit and check it out
    Reset(ResetArgs),
    /// Merge a branch into the current branch
    Merge(BranchArgs),
    /// Show first-parent history from the current commit
    Log,
    /// Show every commit ever made
    #[command(name = "global-log")]
    GlobalLog,
    /// Print the ids of commits with the given message
    Find(FindArgs),
    /// Show branches, staged changes and untracked files
    Status,
}

#[derive(Args)]
pub struct InitArgs {
    /// Name of the first branch
    #[arg(long, value_name = "NAME")]
    pub default_branch: Option<String>,
}

#[derive(Args)]
pub struct PathArgs {
    pub path: String,
}

#[derive(Args)]
pub struct CommitArgs {
    pub message: String,
}

/// `checkout <branch>`, `checkout -- <path>` or `checkout <commit> -- <path>`.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Branch to switch to, or commit to restore `path` from
    pub target: Option<String>,
    /// File to restore
    #[arg(last = true)]
    pub path: Option<String>,
}

#[derive(Args)]
pub struct BranchArgs {
    pub name: String,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Full or abbreviated commit id
    pub commit: String,
}

#[derive(Args)]
pub struct FindArgs {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["twig", "init"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.default_branch, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_init_default_branch() {
        let cli = Cli::try_parse_from(["twig", "init", "--default-branch", "main"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.default_branch, Some("main".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_commit_message() {
        let cli = Cli::try_parse_from(["twig", "commit", "add the parser"]).unwrap();
        if let Command::Commit(args) = cli.command {
            assert_eq!(args.message, "add the parser");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn commit_requires_message() {
        assert!(Cli::try_parse_from(["twig", "commit"]).is_err());
    }

    #[test]
    fn parse_checkout_branch() {
        let cli = Cli::try_parse_from(["twig", "checkout", "dev"]).unwrap();
        if let Command::Checkout(args) = cli.command {
            assert_eq!(args.target, Some("dev".into()));
            assert_eq!(args.path, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_checkout_file() {
        let cli = Cli::try_parse_from(["twig", "checkout", "--", "a.txt"]).unwrap();
        if let Command::Checkout(args) = cli.command {
            assert_eq!(args.target, None);
            assert_eq!(args.path, Some("a.txt".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_checkout_file_at_commit() {
        let cli = Cli::try_parse_from(["twig", "checkout", "3f2a9c1", "--", "a.txt"]).unwrap();
        if let Command::Checkout(args) = cli.command {
            assert_eq!(args.target, Some("3f2a9c1".into()));
            assert_eq!(args.path, Some("a.txt".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_rm_branch() {
        let cli = Cli::try_parse_from(["twig", "rm-branch", "old"]).unwrap();
        if let Command::RmBranch(args) = cli.command {
            assert_eq!(args.name, "old");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_log() {
        let cli = Cli::try_parse_from(["twig", "global-log"]).unwrap();
        assert!(matches!(cli.command, Command::GlobalLog));
    }

    #[test]
    fn parse_merge() {
        let cli = Cli::try_parse_from(["twig", "merge", "feature"]).unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.name, "feature");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["twig", "status", "-v", "--format", "json", "-C", "/tmp/r"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/r")));
    }

    #[test]
    fn default_format_is_text() {
        let cli = Cli::try_parse_from(["twig", "log"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.verbose);
    }
}
