//! Template aggregate.
//!
//! A template is one directory under the template root:
//!
//! ```text
//! templates/
//! ├── base/
//! │   ├── cookiecutter.json           ← manifest (defaults + `_layering`)
//! │   └── {{cookiecutter.project_slug}}/  ← the single content directory
//! └── docker/
//!     ├── cookiecutter.json
//!     └── {{cookiecutter.project_slug}}/
//! ```
//!
//! The manifest is a JSON object of default parameters. Layering metadata
//! lives under the reserved `_layering` key and is stripped from the defaults:
//!
//! ```json
//! {
//!     "layer": "svc",
//!     "project_slug": "myproj",
//!     "_layering": { "extends": ["base"], "inherits": ["project_slug"] }
//! }
//! ```
//!
//! Reading the directory is an adapter concern; this module only validates
//! what the adapter found.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{
    entities::layer::{LAYER_KEY, LAYERING_KEY, Params},
    error::DomainError,
};

/// File name of the per-template manifest.
pub const MANIFEST_FILE: &str = "cookiecutter.json";

/// Marker identifying the content directory among a template's children.
pub const CONTENT_MARKER: &str = "{{";

/// A resolved, validated template. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    root: PathBuf,
    content_dir: PathBuf,
    defaults: Params,
    extends: BTreeSet<String>,
    inherits: BTreeSet<String>,
}

/// `_layering` section of the manifest.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayeringSection {
    #[serde(default)]
    extends: Vec<String>,
    #[serde(default)]
    inherits: Vec<String>,
}

impl Template {
    /// Build a template from its parsed manifest and the child directories of
    /// its root that carry the [`CONTENT_MARKER`].
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidTemplate`] when the manifest is not a JSON
    ///   object or `_layering` is malformed.
    /// - [`DomainError::MissingContentDirectory`] / [`DomainError::AmbiguousContentDirectory`]
    ///   unless exactly one candidate is given.
    pub fn from_manifest(
        name: impl Into<String>,
        root: impl Into<PathBuf>,
        manifest: Value,
        content_candidates: Vec<PathBuf>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let root = root.into();

        let Value::Object(mut defaults) = manifest else {
            return Err(DomainError::invalid_template(
                &name,
                format!("{MANIFEST_FILE} must contain a JSON object"),
            ));
        };

        let layering = match defaults.remove(LAYERING_KEY) {
            Some(value) => serde_json::from_value::<LayeringSection>(value).map_err(|e| {
                DomainError::invalid_template(&name, format!("malformed '{LAYERING_KEY}': {e}"))
            })?,
            None => LayeringSection::default(),
        };

        let content_dir = match <[PathBuf; 1]>::try_from(content_candidates) {
            Ok([dir]) => dir,
            Err(candidates) if candidates.is_empty() => {
                return Err(DomainError::MissingContentDirectory { name, path: root });
            }
            Err(candidates) => {
                return Err(DomainError::AmbiguousContentDirectory { name, candidates });
            }
        };

        Ok(Self {
            name,
            root,
            content_dir,
            defaults,
            extends: layering.extends.into_iter().collect(),
            inherits: layering.inherits.into_iter().collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The single directory rendered for each layer of this template.
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Default parameters, without the `_layering` metadata.
    pub fn defaults(&self) -> &Params {
        &self.defaults
    }

    /// Templates this one declares as prerequisites.
    pub fn extends(&self) -> &BTreeSet<String> {
        &self.extends
    }

    /// Variables this template accepts from earlier layers.
    pub fn inherits(&self) -> &BTreeSet<String> {
        &self.inherits
    }

    /// Base layer identifier: the `layer` default when it is a string,
    /// otherwise the template name.
    pub fn default_layer_id(&self) -> &str {
        self.defaults
            .get(LAYER_KEY)
            .and_then(Value::as_str)
            .unwrap_or(&self.name)
    }
}

/// `true` when a directory name marks template content.
pub fn is_content_dir_name(name: &str) -> bool {
    name.contains(CONTENT_MARKER)
}
