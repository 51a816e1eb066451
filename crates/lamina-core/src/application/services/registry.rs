//! Template Registry - resolves names to cached templates.

use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, RwLock},
};

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::TemplateCatalog},
    domain::Template,
    error::LaminaResult,
};

/// Resolves template names under one root, constructing each template once.
///
/// The cache lives as long as the registry; one registry is created per
/// command invocation.
pub struct TemplateRegistry {
    catalog: Box<dyn TemplateCatalog>,
    cache: RwLock<HashMap<String, Arc<Template>>>,
}

impl TemplateRegistry {
    pub fn new(catalog: Box<dyn TemplateCatalog>) -> Self {
        Self {
            catalog,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Look up `name`, loading and caching it on first use.
    #[instrument(skip(self))]
    pub fn resolve(&self, name: &str) -> LaminaResult<Arc<Template>> {
        {
            let cache = self
                .cache
                .read()
                .map_err(|_| ApplicationError::StoreLockError)?;
            if let Some(template) = cache.get(name) {
                return Ok(Arc::clone(template));
            }
        }

        let template = Arc::new(self.catalog.load(name)?);
        debug!(
            template = %name,
            extends = ?template.extends(),
            inherits = ?template.inherits(),
            "template loaded"
        );

        let mut cache = self
            .cache
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(Arc::clone(
            cache.entry(name.to_string()).or_insert(template),
        ))
    }

    /// Declared dependencies of `name`.
    pub fn extends_of(&self, name: &str) -> LaminaResult<BTreeSet<String>> {
        Ok(self.resolve(name)?.extends().clone())
    }

    /// Available template names, without loading any template.
    pub fn list(&self) -> LaminaResult<Vec<String>> {
        self.catalog.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTemplateCatalog;
    use crate::domain::DomainError;
    use serde_json::json;

    fn template(name: &str) -> Template {
        Template::from_manifest(
            name,
            format!("/t/{name}"),
            json!({"layer": name, "_layering": {"extends": ["base"]}}),
            vec![format!("/t/{name}/{{{{cookiecutter.project_slug}}}}").into()],
        )
        .unwrap()
    }

    #[test]
    fn resolve_loads_once() {
        let mut catalog = MockTemplateCatalog::new();
        catalog
            .expect_load()
            .times(1)
            .returning(|name| Ok(template(name)));

        let registry = TemplateRegistry::new(Box::new(catalog));
        let first = registry.resolve("docker").unwrap();
        let second = registry.resolve("docker").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.defaults(), second.defaults());
    }

    #[test]
    fn resolve_propagates_invalid_template() {
        let mut catalog = MockTemplateCatalog::new();
        catalog.expect_load().returning(|name| {
            Err(DomainError::invalid_template(name, "missing cookiecutter.json").into())
        });

        let registry = TemplateRegistry::new(Box::new(catalog));
        assert!(registry.resolve("nope").is_err());
    }

    #[test]
    fn list_does_not_load_templates() {
        let mut catalog = MockTemplateCatalog::new();
        catalog
            .expect_names()
            .returning(|| Ok(vec!["base".into(), "docker".into()]));
        catalog.expect_load().never();

        let registry = TemplateRegistry::new(Box::new(catalog));
        assert_eq!(registry.list().unwrap(), ["base", "docker"]);
    }

    #[test]
    fn extends_of_reads_manifest() {
        let mut catalog = MockTemplateCatalog::new();
        catalog.expect_load().returning(|name| Ok(template(name)));

        let registry = TemplateRegistry::new(Box::new(catalog));
        assert!(registry.extends_of("docker").unwrap().contains("base"));
    }
}
