//! Upgrade Service - regenerates a project on a branch and commits the result.
//!
//! Workflow:
//! 1. Check the project is a repository, then optionally fetch remotes
//! 2. Check out the target branch in a scratch worktree inside the project
//! 3. Delete every tracked file and prune the empty directories left behind
//! 4. Build the config document into the worktree, overwriting in place
//! 5. Stage, then run the validation hook until it passes (bounded attempts)
//! 6. Commit and remove the worktree
//!
//! When the hook never passes, the worktree is kept for inspection.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{EntryKind, Filesystem, HookOutcome, ValidationHook, VersionControl},
        services::{
            build_service::{BuildOptions, BuildService},
            merge_engine::Placement,
        },
    },
    domain::{ConfigDocument, DomainValidator, TemplateSource},
    error::{LaminaError, LaminaResult},
};

/// Directory kept out of emptiness pruning.
const VCS_DIR: &str = ".git";

/// Tunables for [`UpgradeService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeSettings {
    /// Worktree directory name, relative to the project.
    pub worktree_name: String,
    /// Per-run limit for the validation hook.
    pub hook_timeout: Duration,
    pub max_attempts: u32,
}

impl Default for UpgradeSettings {
    fn default() -> Self {
        Self {
            worktree_name: "TEMPLATE_UPDATE".to_string(),
            hook_timeout: Duration::from_secs(30),
            max_attempts: 3,
        }
    }
}

/// One upgrade invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRequest {
    pub project_dir: PathBuf,
    pub branch: String,
    /// Fetch every remote first.
    pub remote: bool,
    /// Overrides the document's recorded source.
    pub source: Option<TemplateSource>,
}

/// Commit message for an upgrade to `source`.
pub fn commit_message(source: &TemplateSource) -> String {
    format!("Update to {}@{}", source.short_name(), source.revision)
}

pub struct UpgradeService {
    builder: BuildService,
    vcs: Box<dyn VersionControl>,
    hook: Box<dyn ValidationHook>,
    filesystem: Arc<dyn Filesystem>,
    settings: UpgradeSettings,
}

impl UpgradeService {
    pub fn new(
        builder: BuildService,
        vcs: Box<dyn VersionControl>,
        hook: Box<dyn ValidationHook>,
        filesystem: Arc<dyn Filesystem>,
    ) -> Self {
        Self {
            builder,
            vcs,
            hook,
            filesystem,
            settings: UpgradeSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: UpgradeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run the upgrade and return the commit message used.
    #[instrument(
        skip_all,
        fields(
            project = %request.project_dir.display(),
            branch = %request.branch,
            remote = request.remote
        )
    )]
    pub fn upgrade(
        &self,
        doc: &ConfigDocument,
        request: &UpgradeRequest,
        scratch_root: &Path,
    ) -> LaminaResult<String> {
        DomainValidator::validate_document(doc)?;
        let source = request
            .source
            .as_ref()
            .or(doc.source())
            .ok_or_else(|| ApplicationError::RepositoryState {
                reason: "no template source recorded; the commit message needs a repository and revision"
                    .into(),
            })?;
        let message = commit_message(source);

        let project = request.project_dir.as_path();
        if !self.vcs.is_repository(project) {
            return Err(ApplicationError::RepositoryState {
                reason: format!("{} is not a git repository", project.display()),
            }
            .into());
        }
        if request.remote {
            info!("Fetching remotes");
            self.vcs.fetch_all(project)?;
        }
        let worktree = project.join(&self.settings.worktree_name);
        if self.filesystem.exists(&worktree) {
            return Err(ApplicationError::RepositoryState {
                reason: format!(
                    "worktree directory {} already exists; remove it and try again",
                    worktree.display()
                ),
            }
            .into());
        }

        self.vcs.add_worktree(project, &worktree, &request.branch)?;
        info!(worktree = %worktree.display(), "Worktree created");

        match self.update_worktree(doc, &worktree, scratch_root, &message) {
            Ok(()) => {
                self.vcs.remove_worktree(project, &worktree)?;
                info!(%message, "Upgrade committed");
                Ok(message)
            }
            Err(e @ LaminaError::Application(ApplicationError::ValidationHookFailed { .. })) => {
                warn!(worktree = %worktree.display(), "Leaving worktree for inspection");
                Err(e)
            }
            Err(e) => {
                if let Err(cleanup) = self.vcs.remove_worktree(project, &worktree) {
                    warn!(error = %cleanup, "Failed to remove worktree");
                }
                Err(e)
            }
        }
    }

    fn update_worktree(
        &self,
        doc: &ConfigDocument,
        worktree: &Path,
        scratch_root: &Path,
        message: &str,
    ) -> LaminaResult<()> {
        self.clear_tracked_files(worktree)?;
        self.prune_empty_dirs(worktree)?;

        let options = BuildOptions::default()
            .overwrite(true)
            .placement(Placement::Inline);
        self.builder.build(doc, worktree, options, scratch_root)?;

        self.vcs.stage_all(worktree)?;
        self.run_hook(worktree)?;

        let status = self.vcs.status(worktree)?;
        info!("Worktree status:\n{status}");
        self.vcs.commit(worktree, message)
    }

    fn clear_tracked_files(&self, worktree: &Path) -> LaminaResult<()> {
        let tracked = self.vcs.tracked_files(worktree)?;
        info!(files = tracked.len(), "Removing existing content");
        for file in tracked {
            let path = worktree.join(file);
            if self.filesystem.exists(&path) {
                self.filesystem.remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Remove empty directories below `dir`, deepest first. `dir` itself and
    /// `.git` are kept.
    fn prune_empty_dirs(&self, dir: &Path) -> LaminaResult<()> {
        for entry in self.filesystem.read_dir(dir)? {
            if entry.file_name().is_some_and(|n| n == VCS_DIR) {
                continue;
            }
            if self.filesystem.entry_kind(&entry)? != EntryKind::Directory {
                continue;
            }
            self.prune_empty_dirs(&entry)?;
            if self.filesystem.read_dir(&entry)?.is_empty() {
                debug!(path = %entry.display(), "Pruning empty directory");
                self.filesystem.remove_dir(&entry)?;
            }
        }
        Ok(())
    }

    fn run_hook(&self, worktree: &Path) -> LaminaResult<()> {
        let attempts = self.settings.max_attempts;
        for attempt in 1..=attempts {
            info!(attempt, "Running validation hook");
            match self.hook.run(worktree, self.settings.hook_timeout)? {
                HookOutcome::Passed => return Ok(()),
                HookOutcome::Failed { code } => {
                    warn!(attempt, ?code, "Validation hook failed");
                }
                HookOutcome::TimedOut => {
                    warn!(
                        attempt,
                        timeout_secs = self.settings.hook_timeout.as_secs(),
                        "Validation hook timed out"
                    );
                }
            }
            self.vcs.stage_all(worktree)?;
        }

        Err(ApplicationError::ValidationHookFailed {
            attempts,
            worktree: worktree.to_path_buf(),
        }
        .into())
    }
}
