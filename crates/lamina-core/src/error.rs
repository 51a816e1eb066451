//! Unified error handling for Lamina Core.
//!
//! [`LaminaError`] wraps domain and application errors behind one type with
//! a category and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Lamina Core operations.
///
/// This enum wraps all possible errors that can occur when using lamina-core,
/// providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum LaminaError {
    /// Errors from the domain layer (composition rule violations).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration and capability failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl LaminaError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Template => ErrorCategory::Template,
                crate::domain::ErrorCategory::Consistency => ErrorCategory::Conflict,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// `true` when this is [`ApplicationError::OutputExists`].
    pub fn is_output_exists(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::OutputExists { .. }))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input (config document, repository preconditions).
    Validation,
    /// Missing or malformed template.
    Template,
    /// Collision between layers or with existing output.
    Conflict,
    /// An external capability (renderer, prompter, git, hook) failed.
    External,
    /// Local I/O or lock failure.
    Internal,
}

/// Convenient result type alias.
pub type LaminaResult<T> = Result<T, LaminaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn domain_errors_are_transparent() {
        let err: LaminaError = DomainError::EmptyConfigDocument.into();
        assert_eq!(err.to_string(), "Config document contains no layers");
    }

    #[test]
    fn output_exists_is_a_conflict() {
        let err: LaminaError = ApplicationError::OutputExists {
            path: PathBuf::from("/tmp/out/myproj"),
        }
        .into();
        assert!(err.is_output_exists());
        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert!(err.suggestions().iter().any(|s| s.contains("--overwrite")));
    }

    #[test]
    fn inconsistent_names_are_a_conflict() {
        let err: LaminaError = DomainError::InconsistentTopLevelName {
            expected: "a".into(),
            found: "b".into(),
            layer: "x".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }
}
