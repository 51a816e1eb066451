//! Integration tests for lamina-core, driven through the public API with
//! in-test port implementations.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use lamina_core::prelude::*;
use lamina_core::{application::ApplicationError, domain::DomainError};
use serde_json::{Value, json};

/// Catalog backed by a fixed set of manifests.
struct FixedCatalog {
    manifests: HashMap<&'static str, Value>,
}

impl FixedCatalog {
    fn new(manifests: &[(&'static str, Value)]) -> Self {
        Self {
            manifests: manifests.iter().cloned().collect(),
        }
    }
}

impl TemplateCatalog for FixedCatalog {
    fn names(&self) -> LaminaResult<Vec<String>> {
        let mut names: Vec<String> = self.manifests.keys().map(|n| n.to_string()).collect();
        names.sort();
        Ok(names)
    }

    fn load(&self, name: &str) -> LaminaResult<Template> {
        let manifest = self.manifests.get(name).cloned().ok_or_else(|| {
            DomainError::invalid_template(name, "no such template directory")
        })?;
        let root = PathBuf::from("/templates").join(name);
        let content = root.join("{{cookiecutter.project_slug}}");
        Ok(Template::from_manifest(name, root, manifest, vec![content])?)
    }
}

/// Accepts every default unchanged.
struct AcceptDefaults;

impl Prompter for AcceptDefaults {
    fn prompt(&self, _template: &Template, context: Params) -> LaminaResult<Params> {
        Ok(context)
    }
}

fn registry() -> Arc<TemplateRegistry> {
    Arc::new(TemplateRegistry::new(Box::new(FixedCatalog::new(&[
        (
            "base",
            json!({"layer": "svc", "project_slug": "myproj", "python_version": "3.11"}),
        ),
        (
            "docker",
            json!({
                "project_slug": "unset",
                "python_version": "3.9",
                "_layering": {"extends": ["base"], "inherits": ["project_slug", "python_version"]}
            }),
        ),
        (
            "ci",
            json!({"_layering": {"extends": ["docker"]}}),
        ),
        (
            "loop-a",
            json!({"_layering": {"extends": ["loop-b"]}}),
        ),
        (
            "loop-b",
            json!({"_layering": {"extends": ["loop-a"]}}),
        ),
    ]))))
}

#[test]
fn docker_on_base_scenario() {
    let service = ConfigureService::new(registry(), Box::new(AcceptDefaults));
    let (expansion, doc) = service
        .configure(&["docker".into()], ExpansionPolicy::SingleLevel, None)
        .unwrap();

    assert_eq!(expansion.templates, ["base", "docker"]);

    let ids: Vec<_> = doc.layers().iter().map(Layer::layer_name).collect();
    assert_eq!(ids, ["svc", "docker"]);
    assert_eq!(doc.layers()[1].params()["project_slug"], json!("myproj"));
    assert_eq!(doc.layers()[1].params()["python_version"], json!("3.11"));
}

#[test]
fn single_level_does_not_follow_chains() {
    let service = ConfigureService::new(registry(), Box::new(AcceptDefaults));
    let (expansion, _) = service
        .configure(&["ci".into()], ExpansionPolicy::SingleLevel, None)
        .unwrap();
    assert_eq!(expansion.templates, ["docker", "ci"]);
}

#[test]
fn transitive_follows_chains() {
    let service = ConfigureService::new(registry(), Box::new(AcceptDefaults));
    let (expansion, doc) = service
        .configure(&["ci".into()], ExpansionPolicy::Transitive, None)
        .unwrap();
    assert_eq!(expansion.templates, ["base", "docker", "ci"]);
    assert_eq!(doc.len(), 3);
}

#[test]
fn transitive_cycle_is_reported() {
    let service = ConfigureService::new(registry(), Box::new(AcceptDefaults));
    let err = service
        .configure(&["loop-a".into()], ExpansionPolicy::Transitive, None)
        .unwrap_err();
    assert!(matches!(
        err,
        LaminaError::Domain(DomainError::DependencyCycle { .. })
    ));
}

#[test]
fn configured_document_survives_persistence() {
    let service = ConfigureService::new(registry(), Box::new(AcceptDefaults));
    let source = TemplateSource::new("https://example.org/acme/py-templates.git", "v2.0.0");
    let (_, doc) = service
        .configure(
            &["base".into(), "base".into(), "docker".into()],
            ExpansionPolicy::SingleLevel,
            Some(source),
        )
        .unwrap();

    let json = doc.to_json().unwrap();
    assert!(json.contains("\n    \"layers\""));
    assert_eq!(ConfigDocument::from_json(&json).unwrap(), doc);

    let ids: Vec<_> = doc.layers().iter().map(Layer::layer_name).collect();
    assert_eq!(ids, ["svc", "svc-2", "docker"]);
}

#[test]
fn unknown_template_fails_configuration() {
    let service = ConfigureService::new(registry(), Box::new(AcceptDefaults));
    let err = service
        .configure(&["missing".into()], ExpansionPolicy::SingleLevel, None)
        .unwrap_err();
    assert!(matches!(
        err,
        LaminaError::Domain(DomainError::InvalidTemplate { .. })
    ));
}

#[test]
fn registry_lists_names_sorted() {
    let names = registry().list().unwrap();
    assert_eq!(names, ["base", "ci", "docker", "loop-a", "loop-b"]);
}

#[test]
fn output_exists_error_is_reported_as_conflict() {
    let err: LaminaError = ApplicationError::OutputExists {
        path: "/out/myproj".into(),
    }
    .into();
    assert_eq!(err.category(), lamina_core::error::ErrorCategory::Conflict);
}
