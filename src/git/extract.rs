//! Per-revision snapshot extraction.

use std::path::Path;

use git2::{Commit, ObjectType, Oid, Repository, Sort};
use time::{OffsetDateTime, UtcOffset};

use super::error::ExtractError;
use super::paths::{PathRule, candidate_paths};
use crate::core::{CalDate, CommitInfo, EntryRecord, Snapshot};
use crate::error::FailureScope;
use crate::report::{Report, Stage};

/// Enumerate commits that touched the tracked file, oldest first.
///
/// A commit counts as touching the file when the blob at any rule path
/// differs from the first parent's (or exists in a root commit).
pub fn tracked_commits(
    repo: &Repository,
    rules: &[PathRule],
) -> Result<Vec<CommitInfo>, ExtractError> {
    let mut walk = repo.revwalk().map_err(ExtractError::Revwalk)?;
    walk.push_head().map_err(ExtractError::Revwalk)?;
    walk.set_sorting(Sort::TIME | Sort::REVERSE)
        .map_err(ExtractError::Revwalk)?;

    let mut commits = Vec::new();
    for oid in walk {
        let oid = oid.map_err(ExtractError::Revwalk)?;
        let commit = repo.find_commit(oid)?;
        if touches_tracked_file(&commit, rules)? {
            commits.push(CommitInfo {
                id: oid.to_string(),
                date: commit_date(&commit)?,
            });
        }
    }
    Ok(commits)
}

fn touches_tracked_file(commit: &Commit<'_>, rules: &[PathRule]) -> Result<bool, ExtractError> {
    let tree = commit.tree()?;
    let parent_tree = match commit.parent(0) {
        Ok(parent) => Some(parent.tree()?),
        Err(_) => None,
    };
    for rule in rules {
        let path = Path::new(&rule.path);
        let now = tree.get_path(path).ok().map(|e| e.id());
        let before = parent_tree
            .as_ref()
            .and_then(|t| t.get_path(path).ok())
            .map(|e| e.id());
        if now != before {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Committer date in the committer's own offset, matching what the file's
/// authors saw when they wrote entry dates.
fn commit_date(commit: &Commit<'_>) -> Result<CalDate, ExtractError> {
    let t = commit.time();
    let utc = OffsetDateTime::from_unix_timestamp(t.seconds()).map_err(ExtractError::Timestamp)?;
    let offset =
        UtcOffset::from_whole_seconds(t.offset_minutes() * 60).unwrap_or(UtcOffset::UTC);
    Ok(CalDate::new(utc.to_offset(offset).date()))
}

/// Retrieve and parse the tracked file as it existed at one commit.
pub fn snapshot_at(
    repo: &Repository,
    commit: &CommitInfo,
    rules: &[PathRule],
) -> Result<Snapshot, ExtractError> {
    let candidates = candidate_paths(rules, commit.date);
    if candidates.is_empty() {
        return Err(ExtractError::NoPathRule {
            commit: commit.id.clone(),
            date: commit.date,
        });
    }

    let oid = Oid::from_str(&commit.id)?;
    let tree = repo.find_commit(oid)?.tree()?;

    for path in candidates {
        let Ok(entry) = tree.get_path(Path::new(path)) else {
            continue;
        };
        if entry.kind() != Some(ObjectType::Blob) {
            return Err(ExtractError::NotABlob {
                commit: commit.id.clone(),
                path: path.to_owned(),
            });
        }
        let object = entry.to_object(repo)?;
        let blob = object.as_blob().ok_or_else(|| ExtractError::NotABlob {
            commit: commit.id.clone(),
            path: path.to_owned(),
        })?;
        let entries: Vec<EntryRecord> =
            serde_json::from_slice(blob.content()).map_err(|e| ExtractError::Format {
                commit: commit.id.clone(),
                source: e,
            })?;
        return Ok(Snapshot {
            commit: commit.clone(),
            entries,
        });
    }

    Err(ExtractError::NotFound {
        commit: commit.id.clone(),
    })
}

/// Extract every snapshot of the tracked file, oldest first.
///
/// Revision-scope failures (file not yet created, malformed historical
/// content) drop that revision and are reported; anything else aborts.
pub fn extract_snapshots(
    repo_path: &Path,
    rules: &[PathRule],
    report: &mut Report,
) -> Result<Vec<Snapshot>, ExtractError> {
    let repo = Repository::open(repo_path)
        .map_err(|e| ExtractError::OpenRepo(repo_path.to_path_buf(), e))?;
    let commits = tracked_commits(&repo, rules)?;
    tracing::info!(commits = commits.len(), "enumerated tracked revisions");

    let mut snapshots = Vec::with_capacity(commits.len());
    for commit in commits {
        match snapshot_at(&repo, &commit, rules) {
            Ok(snapshot) => {
                tracing::debug!(
                    commit = %snapshot.commit.id,
                    date = %snapshot.commit.date,
                    entries = snapshot.entries.len(),
                    "extracted snapshot"
                );
                snapshots.push(snapshot);
            }
            Err(e) if e.scope() == FailureScope::Revision => {
                report.warn(
                    Stage::Extract,
                    format!("skipped revision {} ({}): {e}", commit.id, commit.date),
                );
            }
            Err(e) => return Err(e),
        }
    }
    Ok(snapshots)
}
