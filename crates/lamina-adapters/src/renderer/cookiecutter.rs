//! Renderer delegating to an installed `cookiecutter` executable.
//!
//! The layer parameters are written to a replay file so cookiecutter renders
//! without prompting, with exactly the values recorded in the config document.

use std::{
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use lamina_core::{
    application::{ApplicationError, ports::Renderer},
    domain::{LAYER_KEY, Params, Template},
    error::{LaminaError, LaminaResult},
};

/// Renders templates by running `cookiecutter --replay-file`.
#[derive(Debug, Clone)]
pub struct CookiecutterRenderer {
    program: PathBuf,
}

impl CookiecutterRenderer {
    pub fn new() -> Self {
        Self::with_program("cookiecutter")
    }

    /// Use a specific executable instead of `cookiecutter` from `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn replay_file(&self, context: &Params, layer: &str) -> LaminaResult<NamedTempFile> {
        let fail = |reason: String| -> LaminaError {
            ApplicationError::RenderFailed {
                layer: layer.to_string(),
                reason,
            }
            .into()
        };

        let mut file = tempfile::Builder::new()
            .prefix("lamina-replay-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| fail(format!("cannot create replay file: {e}")))?;
        let replay = json!({ "cookiecutter": context });
        serde_json::to_writer(&mut file, &replay)
            .map_err(|e| fail(format!("cannot write replay file: {e}")))?;
        file.flush()
            .map_err(|e| fail(format!("cannot write replay file: {e}")))?;
        Ok(file)
    }
}

impl Default for CookiecutterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CookiecutterRenderer {
    #[instrument(skip_all, fields(template = %template.name(), output = %output_dir.display()))]
    fn render(&self, template: &Template, context: &Params, output_dir: &Path) -> LaminaResult<()> {
        let layer = context
            .get(LAYER_KEY)
            .and_then(Value::as_str)
            .unwrap_or(template.name());
        let replay = self.replay_file(context, layer)?;

        // Replay already suppresses prompts; cookiecutter rejects it
        // combined with --no-input.
        let output = Command::new(&self.program)
            .arg("--replay-file")
            .arg(replay.path())
            .arg("--output-dir")
            .arg(output_dir)
            .arg(template.root())
            .output()
            .map_err(|e| ApplicationError::RenderFailed {
                layer: layer.to_string(),
                reason: format!("failed to run {}: {e}", self.program.display()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ApplicationError::RenderFailed {
                layer: layer.to_string(),
                reason: format!("cookiecutter exited with {}: {}", output.status, stderr.trim()),
            }
            .into());
        }

        debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim(), "cookiecutter finished");
        Ok(())
    }
}
