//! Text and JSON rendering of command results.
//!
//! Text output uses `===` headed log entries and status sections. JSON
//! output uses hex strings for every object id.

use chrono::Local;
use colored::Colorize;
use serde_json::{json, Value};
use twig_repo::{LogEntry, MergeConflict, MergeReport, ObjectId, RepoStatus, StatusEntry};

const DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

pub fn log_text(entries: &[LogEntry]) -> String {
    let mut lines = Vec::new();
    for entry in entries {
        lines.push("===".to_string());
        lines.push(format!("commit {}", entry.id).yellow().to_string());
        if let Some((parent, alt)) = entry.merge_parents {
            lines.push(format!("Merge: {} {}", parent.short_hex(), alt.short_hex()));
        }
        let date = entry.timestamp.with_timezone(&Local).format(DATE_FORMAT);
        lines.push(format!("Date: {date}"));
        lines.push(entry.message.clone());
        lines.push(String::new());
    }
    join_lines(lines)
}

pub fn log_json(entries: &[LogEntry]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|entry| {
                json!({
                    "commit": entry.id.to_hex(),
                    "merge": entry
                        .merge_parents
                        .map(|(parent, alt)| vec![parent.to_hex(), alt.to_hex()]),
                    "date": entry.timestamp.to_rfc3339(),
                    "message": entry.message,
                })
            })
            .collect(),
    )
}

pub fn status_text(status: &RepoStatus) -> String {
    let changes = &status.changes;
    let branches = status.branches.iter().map(|name| {
        if *name == status.current_branch {
            format!("*{name}").green().bold().to_string()
        } else {
            name.clone()
        }
    });
    let staged = changes.staged.iter().map(|e| e.path.green().to_string());
    let removed = changes.removed.iter().map(|path| path.red().to_string());
    let unstaged = changes
        .unstaged
        .iter()
        .map(|e| format!("{} ({})", e.path, e.status).red().to_string());

    let mut lines = Vec::new();
    section(&mut lines, "Branches", branches);
    section(&mut lines, "Staged Files", staged);
    section(&mut lines, "Removed Files", removed);
    section(&mut lines, "Modifications Not Staged For Commit", unstaged);
    section(&mut lines, "Untracked Files", changes.untracked.iter().cloned());
    join_lines(lines)
}

fn section(lines: &mut Vec<String>, title: &str, entries: impl Iterator<Item = String>) {
    lines.push(format!("=== {title} ==="));
    lines.extend(entries);
    lines.push(String::new());
}

/// Every line, each terminated by a newline.
fn join_lines(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

fn entries_json(entries: &[StatusEntry]) -> Value {
    entries
        .iter()
        .map(|e| json!({ "path": e.path, "status": e.status.to_string() }))
        .collect()
}

pub fn status_json(status: &RepoStatus) -> Value {
    let changes = &status.changes;
    json!({
        "current_branch": status.current_branch,
        "branches": status.branches,
        "staged": entries_json(&changes.staged),
        "removed": changes.removed,
        "unstaged": entries_json(&changes.unstaged),
        "untracked": changes.untracked,
    })
}

fn conflict_json(conflict: &MergeConflict) -> Value {
    json!({
        "path": conflict.path,
        "kind": conflict.kind.to_string(),
        "current": conflict.current.map(|id| id.to_hex()),
        "given": conflict.given.map(|id| id.to_hex()),
        "blob": conflict.blob.to_hex(),
    })
}

pub fn merge_text(report: &MergeReport) -> String {
    match report {
        MergeReport::FastForwarded(_) => "Current branch fast-forwarded.\n".to_string(),
        MergeReport::AlreadyMerged => {
            "Given branch is an ancestor of the current branch.\n".to_string()
        }
        MergeReport::Merged { conflicts, .. } if conflicts.is_empty() => String::new(),
        MergeReport::Merged { conflicts, .. } => {
            let mut lines = vec!["Encountered a merge conflict.".red().bold().to_string()];
            lines.extend(
                conflicts
                    .iter()
                    .map(|conflict| format!("  {} ({})", conflict.path, conflict.kind)),
            );
            join_lines(lines)
        }
    }
}

pub fn merge_json(report: &MergeReport) -> Value {
    match report {
        MergeReport::FastForwarded(id) => {
            json!({ "result": "fast_forward", "commit": id.to_hex() })
        }
        MergeReport::AlreadyMerged => json!({ "result": "already_merged" }),
        MergeReport::Merged { commit, conflicts } => json!({
            "result": "merged",
            "commit": commit.to_hex(),
            "conflicts": conflicts.iter().map(conflict_json).collect::<Vec<_>>(),
        }),
    }
}

pub fn ids_text(ids: &[ObjectId]) -> String {
    ids.iter().map(|id| format!("{id}\n")).collect()
}

pub fn ids_json(ids: &[ObjectId]) -> Value {
    ids.iter().map(|id| Value::String(id.to_hex())).collect()
}
