//! History backend shelling out to the system `git` binary.

use crate::config::PastezConfig;
use crate::error::{PastezError, Result};
use crate::history::HistoryBackend;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Drives `git` with one short-lived process per operation.
///
/// Commits always carry the configured author identity and disable
/// signing, so recording works on machines with no git config at all.
/// `--allow-empty` keeps a rewrite with identical content recorded as a
/// revision of its own.
#[derive(Debug, Clone)]
pub struct GitBackend {
    author_name: String,
    author_email: String,
}

impl GitBackend {
    pub fn new(config: &PastezConfig) -> Self {
        Self {
            author_name: config.author_name.clone(),
            author_email: config.author_email.clone(),
        }
    }

    fn run(&self, root: &Path, args: &[&str]) -> Result<String> {
        debug!(root = %root.display(), ?args, "running git");
        let output = Command::new("git")
            .current_dir(root)
            .args(args)
            .output()
            .map_err(|e| PastezError::Backend(format!("could not run git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(root = %root.display(), %stderr, "git command failed");
            return Err(PastezError::Backend(stderr));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// True once the repository has at least one commit. `git log` errors
    /// on a freshly initialized repository, so `log` probes first.
    fn has_commits(&self, root: &Path) -> bool {
        Command::new("git")
            .current_dir(root)
            .args(["rev-parse", "--verify", "--quiet", "HEAD"])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl HistoryBackend for GitBackend {
    fn init(&self, root: &Path) -> Result<()> {
        self.run(root, &["init", "-q"])?;
        Ok(())
    }

    fn add(&self, root: &Path, filename: &str) -> Result<()> {
        self.run(root, &["add", "--", filename])?;
        Ok(())
    }

    fn remove(&self, root: &Path, filename: &str) -> Result<()> {
        self.run(root, &["rm", "-f", "-q", "--", filename])?;
        Ok(())
    }

    fn commit(&self, root: &Path, message: &str) -> Result<()> {
        let name = format!("user.name={}", self.author_name);
        let email = format!("user.email={}", self.author_email);
        self.run(
            root,
            &[
                "-c",
                &name,
                "-c",
                &email,
                "-c",
                "commit.gpgsign=false",
                "commit",
                "-q",
                "--allow-empty",
                "-m",
                message,
            ],
        )?;
        Ok(())
    }

    fn status(&self, root: &Path) -> Result<String> {
        self.run(root, &["status"])
    }

    fn log(&self, root: &Path) -> Result<String> {
        if !self.has_commits(root) {
            return Ok(String::new());
        }
        self.run(root, &["log"])
    }
}
