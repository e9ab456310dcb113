#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Repository, Signature, Time};
use tempfile::TempDir;

/// A throwaway git repository with date-controlled commits.
pub struct ScratchRepo {
    _temp: TempDir,
    repo: Repository,
    workdir: PathBuf,
}

impl ScratchRepo {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("temp dir");
        let repo = Repository::init(temp.path()).expect("init repo");
        let workdir = temp.path().to_path_buf();
        Self {
            _temp: temp,
            repo,
            workdir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.workdir
    }

    fn signature(date: &str) -> Signature<'static> {
        let date = time::Date::parse(
            date,
            time::macros::format_description!("[year]-[month]-[day]"),
        )
        .expect("fixture date");
        let seconds = date.midnight().assume_utc().unix_timestamp();
        Signature::new("fixture", "fixture@example.com", &Time::new(seconds, 0))
            .expect("signature")
    }

    /// Commit file contents at `rel_path` with a fixed commit date.
    /// Returns the commit hash.
    pub fn commit_file(&self, rel_path: &str, contents: &str, date: &str) -> String {
        let full = self.workdir.join(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&full, contents).expect("write tracked file");

        let mut index = self.repo.index().expect("index");
        index.add_path(Path::new(rel_path)).expect("add path");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = self.repo.find_tree(tree_id).expect("find tree");

        let sig = Self::signature(date);
        let parents: Vec<git2::Commit<'_>> = match self.repo.head() {
            Ok(head) => vec![head.peel_to_commit().expect("head commit")],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

        let oid = self
            .repo
            .commit(
                Some("HEAD"),
                &sig,
                &sig,
                &format!("update {rel_path}"),
                &tree,
                &parent_refs,
            )
            .expect("commit");
        oid.to_string()
    }

    /// Move the tracked file to a new path in a single commit.
    pub fn move_file(&self, old_path: &str, new_path: &str, contents: &str, date: &str) -> String {
        let mut index = self.repo.index().expect("index");
        index.remove_path(Path::new(old_path)).expect("remove path");
        fs::remove_file(self.workdir.join(old_path)).expect("remove old file");
        index.write().expect("write index");
        self.commit_file(new_path, contents, date)
    }
}
