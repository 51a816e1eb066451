//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `lamina-adapters` crate provides implementations; the CLI adds the
//! interactive prompter.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{Params, Template};
use crate::error::LaminaResult;

/// Kind of a filesystem entry, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlink, socket, fifo, device. Never merged.
    Other,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `lamina_adapters::filesystem::LocalFilesystem` (production)
/// - `lamina_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> LaminaResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Classify an existing path without following symlinks.
    fn entry_kind(&self, path: &Path) -> LaminaResult<EntryKind>;

    /// Children of a directory as full paths, sorted.
    fn read_dir(&self, path: &Path) -> LaminaResult<Vec<PathBuf>>;

    /// Copy one file, overwriting the destination and carrying over
    /// permissions and modification time.
    fn copy_file(&self, from: &Path, to: &Path) -> LaminaResult<()>;

    /// Give the directory `to` the permissions and modification time of
    /// `from`. Called once the directory's contents are in place.
    fn copy_dir_metadata(&self, from: &Path, to: &Path) -> LaminaResult<()>;

    /// Rename a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> LaminaResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> LaminaResult<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> LaminaResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> LaminaResult<()>;
}

/// Port for discovering and loading templates under one root.
///
/// Implemented by:
/// - `lamina_adapters::catalog::FilesystemCatalog`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateCatalog: Send + Sync {
    /// Names of every directory that holds a manifest, sorted.
    fn names(&self) -> LaminaResult<Vec<String>>;

    /// Read and validate one template.
    fn load(&self, name: &str) -> LaminaResult<Template>;
}

/// Port for collecting a layer's final parameters.
///
/// Implemented by:
/// - `lamina_adapters::prompt::DefaultsPrompter` (non-interactive)
/// - `lamina_cli::prompt::DialoguerPrompter` (terminal)
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Return the final mapping for `template`, starting from `context`.
    ///
    /// The returned `layer` value, if any, renames the layer.
    fn prompt(&self, template: &Template, context: Params) -> LaminaResult<Params>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `lamina_adapters::renderer::SimpleRenderer` (placeholder substitution)
/// - `lamina_adapters::renderer::CookiecutterRenderer` (external `cookiecutter`)
#[cfg_attr(test, mockall::automock)]
pub trait Renderer: Send + Sync {
    /// Render `template` with `context` into the empty directory `output_dir`.
    ///
    /// Contract: exactly one top-level directory is created in `output_dir`.
    fn render(&self, template: &Template, context: &Params, output_dir: &Path)
    -> LaminaResult<()>;
}

/// Port for the version-control operations used by the upgrade workflow.
///
/// Implemented by:
/// - `lamina_adapters::vcs::GitCli`
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// `true` if `dir` is inside a working copy.
    fn is_repository(&self, dir: &Path) -> bool;

    /// Fetch every remote.
    fn fetch_all(&self, repo: &Path) -> LaminaResult<()>;

    /// Check out `branch` into a new worktree at `worktree`.
    fn add_worktree(&self, repo: &Path, worktree: &Path, branch: &str) -> LaminaResult<()>;

    /// Remove the worktree, discarding local changes.
    fn remove_worktree(&self, repo: &Path, worktree: &Path) -> LaminaResult<()>;

    /// Tracked files, relative to `worktree`.
    fn tracked_files(&self, worktree: &Path) -> LaminaResult<Vec<PathBuf>>;

    /// Stage every change, including deletions.
    fn stage_all(&self, worktree: &Path) -> LaminaResult<()>;

    /// Human-readable status.
    fn status(&self, worktree: &Path) -> LaminaResult<String>;

    /// Commit staged changes without running commit hooks.
    fn commit(&self, worktree: &Path, message: &str) -> LaminaResult<()>;
}

/// Outcome of one validation hook run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Passed,
    Failed { code: Option<i32> },
    TimedOut,
}

/// Port for the post-generation validation hook (pre-commit style).
///
/// Implemented by:
/// - `lamina_adapters::hook::CommandHook`
#[cfg_attr(test, mockall::automock)]
pub trait ValidationHook: Send + Sync {
    /// Run once in `worktree`, killing the hook after `timeout`.
    fn run(&self, worktree: &Path, timeout: Duration) -> LaminaResult<HookOutcome>;
}
