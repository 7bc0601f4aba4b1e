//! # Git-backed revision source.
//!
//! ```text
//! pull()             → git pull            (stderr → PullReport, non-zero exit → error)
//! current_revision() → git rev-parse HEAD  (any stderr or non-zero exit → error)
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::RevisionError;
use crate::revision::source::{PullReport, RevisionRef, RevisionSource};

/// Captured output of one git invocation.
struct Output {
    stdout: String,
    stderr: String,
}

/// A git checkout on the local filesystem.
#[derive(Debug, Clone)]
pub struct GitRepo {
    dir: PathBuf,
    label: String,
}

impl GitRepo {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let label = dir.display().to_string();
        Self { dir, label }
    }

    /// Creates the source and returns it as a shared handle.
    pub fn arc(dir: impl Into<PathBuf>) -> RevisionRef {
        Arc::new(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn git(&self, args: &[&str]) -> Result<Output, RevisionError> {
        let command = format!("git {}", args.join(" "));
        let out = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| RevisionError::Spawn {
                command: command.clone(),
                dir: self.dir.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
        if !out.status.success() {
            return Err(RevisionError::Command {
                command,
                dir: self.dir.clone(),
                status: out.status.to_string(),
                stderr,
            });
        }
        Ok(Output { stdout, stderr })
    }
}

#[async_trait]
impl RevisionSource for GitRepo {
    fn name(&self) -> &str {
        &self.label
    }

    async fn pull(&self) -> Result<PullReport, RevisionError> {
        let out = self.git(&["pull"]).await?;
        Ok(PullReport {
            stderr: (!out.stderr.is_empty()).then_some(out.stderr),
        })
    }

    async fn current_revision(&self) -> Result<String, RevisionError> {
        let out = self.git(&["rev-parse", "HEAD"]).await?;
        if !out.stderr.is_empty() {
            return Err(RevisionError::Stderr {
                command: "git rev-parse HEAD".into(),
                dir: self.dir.clone(),
                stderr: out.stderr,
            });
        }
        let revision = out.stdout.trim();
        if revision.is_empty() {
            return Err(RevisionError::Empty {
                dir: self.dir.clone(),
            });
        }
        Ok(revision.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn run(dir: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    #[tokio::test]
    async fn revision_of_non_repository_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = GitRepo::new(tmp.path());
        assert!(repo.current_revision().await.is_err());
    }

    #[tokio::test]
    async fn pull_without_remote_fails() {
        if !git_available() {
            return;
        }
        let tmp = tempfile::tempdir().unwrap();
        run(tmp.path(), &["init", "-q"]);
        let repo = GitRepo::new(tmp.path());
        let err = repo.pull().await.unwrap_err();
        assert!(matches!(err, RevisionError::Command { .. }));
    }

    #[tokio::test]
    async fn reads_head_of_fresh_repository() {
        if !git_available() {
            return;
        }
        let tmp = tempfile::tempdir().unwrap();
        run(tmp.path(), &["init", "-q"]);
        run(
            tmp.path(),
            &[
                "-c",
                "user.name=signage",
                "-c",
                "user.email=signage@localhost",
                "commit",
                "-q",
                "--allow-empty",
                "-m",
                "init",
            ],
        );

        let repo = GitRepo::new(tmp.path());
        let rev = repo.current_revision().await.unwrap();
        assert_eq!(rev.len(), 40);
        assert!(rev.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(repo.name(), tmp.path().display().to_string());
    }
}
