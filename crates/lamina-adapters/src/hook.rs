//! Validation hook running an external command (pre-commit by default).

use std::{
    path::Path,
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, instrument, warn};

use lamina_core::{
    application::{
        ApplicationError,
        ports::{HookOutcome, ValidationHook},
    },
    error::LaminaResult,
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs a command in the worktree, killing it when the timeout expires.
#[derive(Debug, Clone)]
pub struct CommandHook {
    program: String,
    args: Vec<String>,
}

impl CommandHook {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `pre-commit run --all-files`.
    pub fn pre_commit() -> Self {
        Self::new("pre-commit", ["run", "--all-files"])
    }

    /// Parse a whitespace-separated command line such as
    /// `"pre-commit run --all-files"`.
    ///
    /// Arguments are split on whitespace only. Quotes and escapes are not
    /// interpreted, so `sh -c "make lint"` yields the arguments `-c`,
    /// `"make` and `lint"`. Use [`CommandHook::new`] for arguments that
    /// contain spaces.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandHook {
    fn default() -> Self {
        Self::pre_commit()
    }
}

impl ValidationHook for CommandHook {
    #[instrument(skip(self), fields(program = %self.program))]
    fn run(&self, worktree: &Path, timeout: Duration) -> LaminaResult<HookOutcome> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(worktree)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| ApplicationError::HookUnavailable {
                reason: format!("failed to start '{}': {e}", self.program),
            })?;

        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) if status.success() => {
                    debug!("Hook passed");
                    return Ok(HookOutcome::Passed);
                }
                Ok(Some(status)) => {
                    return Ok(HookOutcome::Failed {
                        code: status.code(),
                    });
                }
                Ok(None) => {
                    if start.elapsed() > timeout {
                        if let Err(e) = child.kill() {
                            warn!(error = %e, "Failed to kill hook");
                        }
                        let _ = child.wait();
                        return Ok(HookOutcome::TimedOut);
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(ApplicationError::HookUnavailable {
                        reason: format!("failed to wait for '{}': {e}", self.program),
                    }
                    .into());
                }
            }
        }
    }
}
