use crate::domain::{entities::ConfigDocument, error::DomainError};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    /// A buildable document has at least one layer.
    pub fn validate_document(doc: &ConfigDocument) -> Result<(), DomainError> {
        if doc.is_empty() {
            return Err(DomainError::EmptyConfigDocument);
        }
        Ok(())
    }

    /// Every rendered layer must share one top-level directory name.
    ///
    /// Takes `(layer name, top-level name)` pairs in layer order and returns
    /// the common name.
    pub fn validate_top_level_names<'a>(
        rendered: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<String, DomainError> {
        let mut expected: Option<&str> = None;
        for (layer, found) in rendered {
            match expected {
                None => expected = Some(found),
                Some(name) if name == found => {}
                Some(name) => {
                    return Err(DomainError::InconsistentTopLevelName {
                        expected: name.to_string(),
                        found: found.to_string(),
                        layer: layer.to_string(),
                    });
                }
            }
        }
        expected
            .map(str::to_string)
            .ok_or(DomainError::EmptyConfigDocument)
    }
}
