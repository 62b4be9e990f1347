//! In-memory history backend for testing.

use crate::error::{PastezError, Result};
use crate::history::HistoryBackend;
use dashmap::DashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default, Clone)]
struct RepoState {
    staged: Vec<String>,
    commits: Vec<String>,
}

/// History backend that journals commits in memory.
///
/// Files still live on disk (the storage unit owns its working tree);
/// only the history bookkeeping is virtual. State lives in a `DashMap`
/// keyed by root, so concurrent units share one journal per directory
/// just as git processes share one `.git`, without needing a `git`
/// binary on the test machine.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    repos: DashMap<PathBuf, RepoState>,
    fail_commits: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable commit failure simulation for testing error handling.
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Commit messages recorded for `root`, oldest first.
    pub fn commit_messages(&self, root: &Path) -> Vec<String> {
        self.repos
            .get(root)
            .map(|repo| repo.commits.clone())
            .unwrap_or_default()
    }

    fn with_repo<T>(
        &self,
        root: &Path,
        op: impl FnOnce(&mut RepoState) -> Result<T>,
    ) -> Result<T> {
        match self.repos.get_mut(root) {
            Some(mut repo) => op(&mut repo),
            None => Err(PastezError::Backend(format!(
                "not a repository: {}",
                root.display()
            ))),
        }
    }
}

impl HistoryBackend for MemoryBackend {
    fn init(&self, root: &Path) -> Result<()> {
        self.repos.entry(root.to_path_buf()).or_default();
        Ok(())
    }

    fn add(&self, root: &Path, filename: &str) -> Result<()> {
        self.with_repo(root, |repo| {
            if !root.join(filename).is_file() {
                return Err(PastezError::Backend(format!(
                    "pathspec '{}' did not match any files",
                    filename
                )));
            }
            if !repo.staged.iter().any(|s| s == filename) {
                repo.staged.push(filename.to_string());
            }
            Ok(())
        })
    }

    fn remove(&self, root: &Path, filename: &str) -> Result<()> {
        self.with_repo(root, |repo| {
            let path = root.join(filename);
            if !path.is_file() {
                return Err(PastezError::Backend(format!(
                    "pathspec '{}' did not match any files",
                    filename
                )));
            }
            fs::remove_file(&path)?;
            if !repo.staged.iter().any(|s| s == filename) {
                repo.staged.push(filename.to_string());
            }
            Ok(())
        })
    }

    fn commit(&self, root: &Path, message: &str) -> Result<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(PastezError::Backend("simulated commit failure".to_string()));
        }
        self.with_repo(root, |repo| {
            repo.commits.push(message.to_string());
            repo.staged.clear();
            Ok(())
        })
    }

    fn status(&self, root: &Path) -> Result<String> {
        self.with_repo(root, |repo| {
            let mut out = String::new();
            if repo.staged.is_empty() {
                out.push_str("nothing staged, working tree clean\n");
            } else {
                out.push_str("staged for next revision:\n");
                for name in &repo.staged {
                    out.push_str("  ");
                    out.push_str(name);
                    out.push('\n');
                }
            }
            out.push_str(&format!("revisions recorded: {}\n", repo.commits.len()));
            Ok(out)
        })
    }

    fn log(&self, root: &Path) -> Result<String> {
        self.with_repo(root, |repo| {
            // Newest first, like git log.
            let mut lines: Vec<&str> = repo.commits.iter().map(String::as_str).collect();
            lines.reverse();
            Ok(lines.join("\n"))
        })
    }
}
