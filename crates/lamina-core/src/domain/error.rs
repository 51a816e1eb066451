// ============================================================================
// domain/error.rs - LAYER COMPOSITION ERROR DOMAIN
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (errors travel through service results unchanged)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Template definition errors
    // ========================================================================
    #[error("Invalid template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },

    #[error("Template '{name}' has no content directory (expected one directory containing '{{{{') under {}", .path.display())]
    MissingContentDirectory { name: String, path: PathBuf },

    #[error("Template '{name}' has more than one content directory: {}", display_paths(.candidates))]
    AmbiguousContentDirectory {
        name: String,
        candidates: Vec<PathBuf>,
    },

    #[error("Dependency cycle between templates: {}", .chain.join(" -> "))]
    DependencyCycle { chain: Vec<String> },

    #[error(
        "Dependency '{dependency}' needs requested template '{prerequisite}', which is listed after '{dependent}' that needs '{dependency}'"
    )]
    UnorderableDependency {
        dependency: String,
        prerequisite: String,
        dependent: String,
    },

    // ========================================================================
    // Config document errors
    // ========================================================================
    #[error("Invalid config document: {0}")]
    InvalidConfigDocument(String),

    #[error("Config document contains no layers")]
    EmptyConfigDocument,

    // ========================================================================
    // Composition invariants
    // ========================================================================
    #[error(
        "Layer '{layer}' rendered top-level directory '{found}', but earlier layers produced '{expected}'"
    )]
    InconsistentTopLevelName {
        expected: String,
        found: String,
        layer: String,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidTemplate`].
    pub fn invalid_template(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidTemplate { name, .. } => vec![
                format!("Check that '{name}' is a directory under the template root"),
                "Each template needs a cookiecutter.json manifest".into(),
                "Try: lamina list".into(),
            ],
            Self::MissingContentDirectory { path, .. } => vec![
                format!("Add a directory such as '{{{{cookiecutter.project_slug}}}}' to {}", path.display()),
            ],
            Self::AmbiguousContentDirectory { .. } => vec![
                "A template may contain exactly one top-level content directory".into(),
                "Rename or remove the extra directories".into(),
            ],
            Self::DependencyCycle { .. } => vec![
                "Remove one of the 'extends' entries forming the cycle".into(),
                "Or expand dependencies without --transitive".into(),
            ],
            Self::UnorderableDependency {
                prerequisite,
                dependent,
                ..
            } => vec![
                format!("Request '{prerequisite}' before '{dependent}'"),
            ],
            Self::InvalidConfigDocument(_) | Self::EmptyConfigDocument => vec![
                "Regenerate the file with: lamina config <TEMPLATE>...".into(),
            ],
            Self::InconsistentTopLevelName { .. } => vec![
                "Every layer must render the same top-level project directory".into(),
                "Make the project name variables agree across layers (use 'inherits')".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidTemplate { .. }
            | Self::MissingContentDirectory { .. }
            | Self::AmbiguousContentDirectory { .. }
            | Self::DependencyCycle { .. }
            | Self::UnorderableDependency { .. } => ErrorCategory::Template,
            Self::InvalidConfigDocument(_) | Self::EmptyConfigDocument => {
                ErrorCategory::Validation
            }
            Self::InconsistentTopLevelName { .. } => ErrorCategory::Consistency,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
    Consistency,
}
