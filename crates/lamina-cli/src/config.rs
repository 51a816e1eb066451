//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `LAMINA_*` environment variables, `__` between sections
//!    (`LAMINA_UPGRADE__HOOK_TIMEOUT_SECS=60`)
//! 3. Config file (`--config`, else the platform config dir when present)
//! 4. Built-in defaults (always present)

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use lamina_adapters::CommandHook;
use lamina_core::prelude::{TemplateSource, UpgradeSettings};

const ENV_PREFIX: &str = "LAMINA";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub templates: TemplatesConfig,
    pub build: BuildConfig,
    pub upgrade: UpgradeConfig,
    pub output: OutputConfig,
}

/// Where templates live and where they came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Template root used when `--root` is not given.
    pub root: Option<PathBuf>,
    /// Recorded as the document source when `config` gets no `--source-repo`.
    pub repository: Option<String>,
    pub revision: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub renderer: RendererKind,
}

/// Which renderer turns a template into files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Built-in placeholder substitution.
    #[default]
    Simple,
    /// The external `cookiecutter` executable.
    Cookiecutter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    pub worktree_name: String,
    pub hook_command: String,
    pub hook_timeout_secs: u64,
    pub max_hook_attempts: u32,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        let settings = UpgradeSettings::default();
        Self {
            worktree_name: settings.worktree_name,
            hook_command: "pre-commit run --all-files".into(),
            hook_timeout_secs: settings.hook_timeout.as_secs(),
            max_hook_attempts: settings.max_attempts,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration: defaults, then file, then environment.
    ///
    /// An explicit `config_file` must exist; the default location is only
    /// read when present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("serialising built-in defaults")?;

        Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("reading configuration from '{}'", path.display()))?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.lamina.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "lamina", "lamina")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".lamina.toml"))
    }

    /// `--root`, then `templates.root`, then the current directory.
    pub fn template_root(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.templates.root.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Source recorded in the config, when both halves are set.
    pub fn template_source(&self) -> Option<TemplateSource> {
        match (&self.templates.repository, &self.templates.revision) {
            (Some(repo), Some(rev)) => Some(TemplateSource::new(repo, rev)),
            _ => None,
        }
    }

    pub fn upgrade_settings(&self) -> UpgradeSettings {
        UpgradeSettings {
            worktree_name: self.upgrade.worktree_name.clone(),
            hook_timeout: Duration::from_secs(self.upgrade.hook_timeout_secs),
            max_attempts: self.upgrade.max_hook_attempts.max(1),
        }
    }

    /// The configured validation hook; an empty command means the default.
    pub fn hook(&self) -> CommandHook {
        CommandHook::from_command_line(&self.upgrade.hook_command).unwrap_or_default()
    }
}
