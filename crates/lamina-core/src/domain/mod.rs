// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Lamina.
//!
//! This module contains the pure composition rules with no I/O:
//!
//! - **Templates**: validated manifests (`defaults`, `extends`, `inherits`)
//! - **Layers**: one configured use of a template, with its resolved parameters
//! - **Shared variable pool**: values flowing from earlier layers to later ones
//! - **Config document**: the ordered, persisted list of layers
//! - **Expansion**: turning requested names into an ordered template list
//!
//! Filesystem access, prompting and rendering are reached through the ports
//! in `crate::application::ports`.

pub mod entities;
pub mod error;
pub mod expansion;

mod validation;

pub use entities::{
    config_document::{ConfigDocument, TemplateSource},
    layer::{
        BOOKKEEPING_KEYS, LAYER_KEY, LAYERING_KEY, Layer, Params, TEMPLATE_KEY, is_layer_private,
        layer_identifier,
    },
    pool::SharedVariablePool,
    template::{CONTENT_MARKER, MANIFEST_FILE, Template, is_content_dir_name},
};

pub use error::{DomainError, ErrorCategory};
pub use expansion::{Expansion, ExpansionPolicy, expand};
pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Top-level name consistency
    // ========================================================================

    #[test]
    fn same_top_level_name_is_accepted() {
        let name =
            DomainValidator::validate_top_level_names([("svc", "myproj"), ("svc-2", "myproj")])
                .unwrap();
        assert_eq!(name, "myproj");
    }

    #[test]
    fn differing_top_level_name_is_rejected() {
        let err = DomainValidator::validate_top_level_names([("svc", "myproj"), ("ci", "other")])
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InconsistentTopLevelName {
                expected: "myproj".into(),
                found: "other".into(),
                layer: "ci".into(),
            }
        );
    }

    #[test]
    fn no_layers_is_rejected() {
        let err = DomainValidator::validate_top_level_names(std::iter::empty::<(&str, &str)>()).unwrap_err();
        assert_eq!(err, DomainError::EmptyConfigDocument);
    }

    // ========================================================================
    // Document validation
    // ========================================================================

    #[test]
    fn empty_document_is_not_buildable() {
        assert!(DomainValidator::validate_document(&ConfigDocument::new()).is_err());
    }

    #[test]
    fn document_with_layer_is_buildable() {
        let mut doc = ConfigDocument::new();
        doc.push(Layer::new("base", 1, "svc", Params::new()));
        assert!(DomainValidator::validate_document(&doc).is_ok());
    }
}
