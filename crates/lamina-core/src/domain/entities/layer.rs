use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::DomainError;

/// Ordered parameter mapping handed to prompters and renderers.
pub type Params = serde_json::Map<String, Value>;

/// Reserved parameter naming the layer itself.
pub const LAYER_KEY: &str = "layer";

/// Manifest key holding `extends` / `inherits`.
pub const LAYERING_KEY: &str = "_layering";

/// Parameter added at render time, pointing at the template content.
pub const TEMPLATE_KEY: &str = "_template";

/// Renderer bookkeeping keys. Never shared between layers.
pub const BOOKKEEPING_KEYS: &[&str] = &["_extensions", TEMPLATE_KEY, "_output_dir", LAYERING_KEY];

/// `true` for keys that must not leak into the shared variable pool.
pub fn is_layer_private(key: &str) -> bool {
    key == LAYER_KEY || BOOKKEEPING_KEYS.contains(&key)
}

/// Layer identifier for the `instance`-th use of a template (1-based).
///
/// ```
/// use lamina_core::domain::layer_identifier;
///
/// assert_eq!(layer_identifier("svc", 1), "svc");
/// assert_eq!(layer_identifier("svc", 3), "svc-3");
/// ```
pub fn layer_identifier(base: &str, instance: usize) -> String {
    if instance > 1 {
        format!("{base}-{instance}")
    } else {
        base.to_string()
    }
}

fn first_instance() -> usize {
    1
}

/// One configured use of a template.
///
/// Invariant: `params[LAYER_KEY] == layer_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Owning template name.
    name: String,
    /// Occurrence of `name` within the document, starting at 1.
    #[serde(default = "first_instance")]
    instance: usize,
    layer_name: String,
    #[serde(rename = "cookiecutter")]
    params: Params,
}

impl Layer {
    /// Create a layer from finalised parameters.
    ///
    /// The `layer` value in `params` wins when it is a non-empty string;
    /// otherwise `fallback_id` is recorded and written back into `params`.
    pub fn new(
        name: impl Into<String>,
        instance: usize,
        fallback_id: impl Into<String>,
        mut params: Params,
    ) -> Self {
        let layer_name = match params.get(LAYER_KEY).and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let id = fallback_id.into();
                params.insert(LAYER_KEY.to_string(), Value::String(id.clone()));
                id
            }
        };

        Self {
            name: name.into(),
            instance,
            layer_name,
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance(&self) -> usize {
        self.instance
    }

    pub fn layer_name(&self) -> &str {
        &self.layer_name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Check the layer-key invariant on a deserialised layer, repairing a
    /// missing key.
    pub(crate) fn normalize(&mut self) -> Result<(), DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::InvalidConfigDocument(
                "layer without a template name".into(),
            ));
        }
        if self.layer_name.is_empty() {
            return Err(DomainError::InvalidConfigDocument(format!(
                "layer of template '{}' has an empty layer_name",
                self.name
            )));
        }
        match self.params.get(LAYER_KEY) {
            None => {
                self.params.insert(
                    LAYER_KEY.to_string(),
                    Value::String(self.layer_name.clone()),
                );
                Ok(())
            }
            Some(Value::String(id)) if *id == self.layer_name => Ok(()),
            Some(other) => Err(DomainError::InvalidConfigDocument(format!(
                "layer '{}' has '{LAYER_KEY}' = {other} in its parameters",
                self.layer_name
            ))),
        }
    }
}
