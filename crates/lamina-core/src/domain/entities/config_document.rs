//! The persisted configuration shared by `config`, `build` and `upgrade`.

use serde::{Deserialize, Serialize};

use crate::domain::{entities::layer::Layer, error::DomainError};

/// Where the templates of a document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSource {
    pub repository: String,
    pub revision: String,
}

impl TemplateSource {
    pub fn new(repository: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            revision: revision.into(),
        }
    }

    /// Last path segment of the repository, without a `.git` suffix.
    ///
    /// `https://example.org/acme/py-templates.git` → `py-templates`
    pub fn short_name(&self) -> &str {
        let trimmed = self.repository.trim_end_matches('/');
        let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
        last.strip_suffix(".git").unwrap_or(last)
    }
}

/// Ordered list of layers. Order is the render and merge order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    layers: Vec<Layer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<TemplateSource>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Option<TemplateSource>) -> Self {
        self.source = source;
        self
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn source(&self) -> Option<&TemplateSource> {
        self.source.as_ref()
    }

    pub fn set_source(&mut self, source: TemplateSource) {
        self.source = Some(source);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Serialize as pretty JSON with four-space indentation.
    pub fn to_json(&self) -> Result<String, DomainError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)
            .map_err(|e| DomainError::InvalidConfigDocument(e.to_string()))?;
        let mut json = String::from_utf8(buf)
            .map_err(|e| DomainError::InvalidConfigDocument(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    /// Parse and validate a document.
    ///
    /// A layer whose parameters lack the `layer` key gets it restored from
    /// `layer_name`; a conflicting value is rejected.
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let mut doc: Self = serde_json::from_str(raw)
            .map_err(|e| DomainError::InvalidConfigDocument(e.to_string()))?;
        for layer in &mut doc.layers {
            layer.normalize()?;
        }
        Ok(doc)
    }
}
