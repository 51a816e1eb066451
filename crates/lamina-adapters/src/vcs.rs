//! Git adapter driving the `git` command line.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use thiserror::Error;
use tracing::{debug, instrument};

use lamina_core::{
    application::{ApplicationError, ports::VersionControl},
    error::{LaminaError, LaminaResult},
};

/// Failure of a single git invocation.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("exited with {code}: {stderr}")]
    Failed { code: String, stderr: String },
}

impl GitError {
    fn into_lamina(self, command: &str) -> LaminaError {
        ApplicationError::VersionControl {
            command: command.to_string(),
            reason: self.to_string(),
        }
        .into()
    }
}

/// [`VersionControl`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }

    fn run(&self, dir: &Path, args: &[&str]) -> LaminaResult<String> {
        debug!(dir = %dir.display(), ?args, "git");
        self.output(dir, args)
            .map_err(|e| e.into_lamina(&args.join(" ")))
    }

    fn output(&self, dir: &Path, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .output()?;

        if !output.status.success() {
            return Err(GitError::Failed {
                code: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for GitCli {
    fn is_repository(&self, dir: &Path) -> bool {
        self.output(dir, &["rev-parse", "--is-inside-work-tree"])
            .map(|out| out.trim() == "true")
            .unwrap_or(false)
    }

    #[instrument(skip(self))]
    fn fetch_all(&self, repo: &Path) -> LaminaResult<()> {
        self.run(repo, &["fetch", "--all"]).map(drop)
    }

    #[instrument(skip(self))]
    fn add_worktree(&self, repo: &Path, worktree: &Path, branch: &str) -> LaminaResult<()> {
        let worktree = worktree.to_string_lossy();
        self.run(repo, &["worktree", "add", &worktree, branch])
            .map(drop)
    }

    #[instrument(skip(self))]
    fn remove_worktree(&self, repo: &Path, worktree: &Path) -> LaminaResult<()> {
        let worktree = worktree.to_string_lossy();
        self.run(repo, &["worktree", "remove", &worktree, "--force"])
            .map(drop)
    }

    fn tracked_files(&self, worktree: &Path) -> LaminaResult<Vec<PathBuf>> {
        let out = self.run(worktree, &["ls-files", "-z"])?;
        Ok(out
            .split('\0')
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    fn stage_all(&self, worktree: &Path) -> LaminaResult<()> {
        self.run(worktree, &["add", "--all", "."]).map(drop)
    }

    fn status(&self, worktree: &Path) -> LaminaResult<String> {
        self.run(worktree, &["status", "--short", "--branch"])
    }

    #[instrument(skip(self))]
    fn commit(&self, worktree: &Path, message: &str) -> LaminaResult<()> {
        self.run(worktree, &["commit", "--no-verify", "-m", message])
            .map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn plain_directory_is_not_a_repository() {
        let temp = TempDir::new().unwrap();
        assert!(!GitCli::new().is_repository(temp.path()));
    }

    #[test]
    fn failures_name_the_command() {
        let temp = TempDir::new().unwrap();
        let err = GitCli::new().status(temp.path()).unwrap_err();
        assert!(err.to_string().contains("'status --short --branch'"));
    }

    #[test]
    fn tracked_files_after_commit() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let git = GitCli::new();
        let dir = temp.path();
        git.run(dir, &["init", "-q"]).unwrap();
        git.run(dir, &["config", "user.email", "dev@example.org"])
            .unwrap();
        git.run(dir, &["config", "user.name", "Dev"]).unwrap();
        fs::create_dir(dir.join("src")).unwrap();
        fs::write(dir.join("src/lib.rs"), "").unwrap();
        git.stage_all(dir).unwrap();
        git.commit(dir, "init").unwrap();

        assert!(git.is_repository(dir));
        assert_eq!(
            git.tracked_files(dir).unwrap(),
            [PathBuf::from("src/lib.rs")]
        );
    }
}
