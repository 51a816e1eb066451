//! CLI errors: what went wrong, what to try next, and which exit code
//! the process ends with.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use lamina_core::error::LaminaError;

pub use lamina_core::error::ErrorCategory as CoreCategory;

pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// A flag or argument was rejected before any work started.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A requested template is not under the template root.
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String, root: PathBuf },

    /// The config document passed to `build` / `upgrade` does not exist.
    #[error("Config document not found: {}", .path.display())]
    DocumentNotFound { path: PathBuf },

    /// The configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error propagated from `lamina-core` or an adapter.
    #[error(transparent)]
    Core(#[from] LaminaError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Feature not compiled in (e.g. interactive prompts).
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Hints printed under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Rejected: {message}"),
                "See `lamina <COMMAND> --help`".into(),
            ],

            Self::TemplateNotFound { name, root } => vec![
                format!("No directory '{}' with a cookiecutter.json under {}", name, root.display()),
                "List available templates: lamina list".into(),
                "Point at another template root with --root DIR".into(),
            ],

            Self::DocumentNotFound { path } => vec![
                format!("Check the path '{}'", path.display()),
                "Create a config document with: lamina config <TEMPLATE>... -o FILE".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Settings could not be loaded: {message}"),
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Environment overrides use LAMINA_<SECTION>__<KEY>".into(),
            ],

            Self::Core(inner) => inner.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("While {message}"),
                "Check that the path exists and is writable".into(),
            ],

            Self::FeatureNotAvailable { feature } => vec![
                format!("This binary was built without the '{feature}' feature"),
                "Pass --no-input to accept template defaults".into(),
                format!("Or install with: cargo install lamina-cli --features {}", feature),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::TemplateNotFound { .. } | Self::DocumentNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Template | CoreCategory::Conflict => {
                    ErrorCategory::UserError
                }
                CoreCategory::External | CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::FeatureNotAvailable { .. } => ErrorCategory::Configuration,
        }
    }

    /// Process exit status; see the crate docs for the table.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Chain of underlying causes, outermost first.
    fn causes(&self) -> impl Iterator<Item = &(dyn Error + 'static)> {
        std::iter::successors(self.source(), |&e| e.source())
    }

    /// Render the error report printed to stderr.
    ///
    /// Causes are listed only when `verbose`; otherwise a hint about `-v`
    /// closes the report.
    pub fn report(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| {
            if color { style(text) } else { text.to_owned() }
        };
        let mut lines = vec![String::new()];

        if color {
            lines.push(format!("{} {}", "✗".red().bold(), "Error:".red().bold()));
            lines.push(format!("  {}", self.to_string().red()));
        } else {
            lines.push(format!("Error: {self}"));
        }

        if verbose {
            for cause in self.causes() {
                lines.push(paint(&format!("  Caused by: {cause}"), |t| t.dimmed().to_string()));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            lines.push(String::new());
            lines.push(paint("Suggestions:", |t| t.yellow().bold().to_string()));
            lines.extend(suggestions.iter().map(|s| format!("  {s}")));
        }

        if !verbose {
            lines.push(String::new());
            lines.push(paint("Run again with -v / --verbose for details.", |t| {
                t.dimmed().to_string()
            }));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Record the failure in the log before it is reported.
    pub fn log(&self) {
        let causes: Vec<String> = self.causes().map(ToString::to_string).collect();
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(category = ?self.category(), ?causes, "{self}")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(category = ?self.category(), ?causes, "{self}")
            }
        }
    }
}

/// Coarse grouping that decides the exit status and log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Something the user can fix, including a refused build.
    UserError,
    NotFound,
    Configuration,
    /// Failures outside the user's input such as git or I/O.
    Internal,
}

/// Lifts io and core results into [`CliResult`], naming what was being done.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: format!("{}: {e}", f().into()),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, LaminaError> {
    /// Core errors already carry their own context; the message is unused.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_core::{application::ApplicationError, domain::DomainError};
    use std::io;

    #[test]
    fn output_exists_is_a_user_error_suggesting_overwrite() {
        let err = CliError::Core(
            ApplicationError::OutputExists {
                path: PathBuf::from("/tmp/out/myproj"),
            }
            .into(),
        );
        assert_eq!(err.exit_code(), 2);
        assert!(err.suggestions().iter().any(|s| s.contains("--overwrite")));
    }

    #[test]
    fn template_not_found_suggests_list() {
        let err = CliError::TemplateNotFound {
            name: "dockr".into(),
            root: PathBuf::from("/srv/templates"),
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.suggestions().iter().any(|s| s.contains("lamina list")));
    }

    #[test]
    fn cycle_is_a_user_error() {
        let err = CliError::Core(
            DomainError::DependencyCycle {
                chain: vec!["a".into(), "b".into(), "a".into()],
            }
            .into(),
        );
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn external_failures_are_internal() {
        let err = CliError::Core(
            ApplicationError::VersionControl {
                command: "commit".into(),
                reason: "boom".into(),
            }
            .into(),
        );
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
        assert_eq!(
            CliError::FeatureNotAvailable {
                feature: "interactive"
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn plain_report_has_header_and_suggestions() {
        let err = CliError::DocumentNotFound {
            path: PathBuf::from("layers.json"),
        };
        let s = err.report(false, false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn verbose_report_lists_causes() {
        let err = Err::<(), _>(io::Error::other("disk full")).with_cli_context(|| "writing");
        let s = err.unwrap_err().report(true, false);
        assert!(s.contains("Caused by: disk full"));
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading config");
        assert!(matches!(cli, Err(CliError::IoError { ref message, .. }) if message.starts_with("reading config")));
    }
}
