//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the external
//! capabilities behind the ports. Composition rule violations are
//! `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The rendering capability failed or broke its single-directory contract.
    #[error("Rendering layer '{layer}' failed: {reason}")]
    RenderFailed { layer: String, reason: String },

    /// The prompt capability failed; configuration is aborted.
    #[error("Collecting parameters for template '{template}' failed: {reason}")]
    PromptFailed { template: String, reason: String },

    /// A rendered tree contains something other than files and directories.
    #[error("Unsupported file type at {path}: only regular files and directories can be merged")]
    UnsupportedFileType { path: PathBuf },

    /// Destination exists and overwrite was not requested.
    #[error("Output already exists at {path}")]
    OutputExists { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Shared state lock was poisoned.
    #[error("Internal lock poisoned")]
    StoreLockError,

    /// Version-control precondition violated.
    #[error("Repository state error: {reason}")]
    RepositoryState { reason: String },

    /// A version-control command failed.
    #[error("Version control command '{command}' failed: {reason}")]
    VersionControl { command: String, reason: String },

    /// The validation hook kept failing.
    #[error("Validation hook did not succeed after {attempts} attempts; worktree left at {worktree}")]
    ValidationHookFailed { attempts: u32, worktree: PathBuf },

    /// The validation hook could not be started.
    #[error("Validation hook could not run: {reason}")]
    HookUnavailable { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RenderFailed { layer, .. } => vec![
                format!("Check the parameters of layer '{layer}' in the config file"),
                "Re-run with -vv to see the renderer output".into(),
            ],
            Self::PromptFailed { .. } => vec![
                "No config file was written".into(),
                "Use --no-input to accept template defaults".into(),
            ],
            Self::UnsupportedFileType { path } => vec![
                format!("Remove or replace {} in the template", path.display()),
                "Symlinks, sockets and device files cannot be merged".into(),
            ],
            Self::OutputExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --overwrite to write into it".into(),
                "Or choose a different output directory with -o".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::RepositoryState { .. } => vec![
                "Make sure the project directory is a git checkout".into(),
                "Remove a leftover update worktree before retrying".into(),
            ],
            Self::VersionControl { command, .. } => vec![
                format!("Try running 'git {command}' manually to see the full error"),
            ],
            Self::ValidationHookFailed { worktree, .. } => vec![
                format!("Inspect and fix the generated files in {}", worktree.display()),
                "Then commit manually, or remove the worktree with 'git worktree remove --force'"
                    .into(),
            ],
            Self::HookUnavailable { .. } => vec![
                "Ensure the hook command (default: pre-commit) is installed and in your PATH"
                    .into(),
            ],
            Self::StoreLockError => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::OutputExists { .. } => ErrorCategory::Conflict,
            Self::UnsupportedFileType { .. } => ErrorCategory::Template,
            Self::RenderFailed { .. }
            | Self::PromptFailed { .. }
            | Self::VersionControl { .. }
            | Self::ValidationHookFailed { .. }
            | Self::HookUnavailable { .. } => ErrorCategory::External,
            Self::RepositoryState { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
