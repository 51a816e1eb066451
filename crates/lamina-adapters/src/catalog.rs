//! Filesystem-based template catalog.
//!
//! Discovers templates under one root directory and reads their
//! `cookiecutter.json` manifests into domain [`Template`] objects.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── base/
//! │   ├── cookiecutter.json               ← manifest (required)
//! │   └── {{cookiecutter.project_slug}}/  ← content (exactly one)
//! ├── docker/
//! │   ├── cookiecutter.json
//! │   └── {{cookiecutter.project_slug}}/
//! └── README.md                           ← ignored
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use lamina_core::{
    application::ports::TemplateCatalog,
    domain::{DomainError, MANIFEST_FILE, Template, is_content_dir_name},
    error::LaminaResult,
};

/// Loads templates from immediate subdirectories of a root directory.
///
/// # Example
///
/// ```no_run
/// use lamina_adapters::FilesystemCatalog;
/// use lamina_core::application::ports::TemplateCatalog;
///
/// let catalog = FilesystemCatalog::new("./templates");
/// for name in catalog.names()? {
///     println!("{name}");
/// }
/// # Ok::<(), lamina_core::error::LaminaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FilesystemCatalog {
    root: PathBuf,
}

impl FilesystemCatalog {
    /// Create a catalog pointed at `root`.
    ///
    /// The directory does not need to exist yet; [`TemplateCatalog::names`]
    /// will return an error if it is missing when called.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Child directories of `dir` whose names carry the content marker.
    fn content_candidates(&self, name: &str, dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
        let mut candidates = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                DomainError::invalid_template(name, format!("directory walk error: {e}"))
            })?;
            if entry.file_type().is_dir()
                && is_content_dir_name(&entry.file_name().to_string_lossy())
            {
                candidates.push(entry.into_path());
            }
        }
        candidates.sort();
        Ok(candidates)
    }
}

impl TemplateCatalog for FilesystemCatalog {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn names(&self) -> LaminaResult<Vec<String>> {
        if !self.root.is_dir() {
            return Err(DomainError::invalid_template(
                self.root.display().to_string(),
                "templates directory not found",
            )
            .into());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() || !entry.path().join(MANIFEST_FILE).is_file() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        debug!(count = names.len(), "finished listing templates");
        Ok(names)
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn load(&self, name: &str) -> LaminaResult<Template> {
        let dir = self.root.join(name);
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(DomainError::invalid_template(
                name,
                format!("missing {MANIFEST_FILE} in '{}'", dir.display()),
            )
            .into());
        }

        let raw = fs::read_to_string(&manifest_path).map_err(|e| {
            DomainError::invalid_template(
                name,
                format!("failed to read '{}': {e}", manifest_path.display()),
            )
        })?;
        let manifest: Value = serde_json::from_str(&raw).map_err(|e| {
            DomainError::invalid_template(
                name,
                format!("failed to parse '{}': {e}", manifest_path.display()),
            )
        })?;

        let candidates = self.content_candidates(name, &dir)?;
        Ok(Template::from_manifest(name, dir, manifest, candidates)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── helpers ───────────────────────────────────────────────────────────

    /// Write a template directory with one content dir under `root`.
    fn make_template_dir(root: &Path, name: &str, manifest: &str, files: &[(&str, &str)]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), manifest).unwrap();

        for (rel_path, content) in files {
            let full = dir.join(rel_path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
    }

    const CONTENT: &str = "{{cookiecutter.project_slug}}/README.md";

    #[test]
    fn names_skips_files_and_dirs_without_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "").unwrap();
        fs::create_dir(temp.path().join("not-a-template")).unwrap();
        make_template_dir(temp.path(), "docker", "{}", &[(CONTENT, "")]);
        make_template_dir(temp.path(), "base", "{}", &[(CONTENT, "")]);

        let names = FilesystemCatalog::new(temp.path()).names().unwrap();
        assert_eq!(names, ["base", "docker"]);
    }

    #[test]
    fn names_fails_for_missing_root() {
        assert!(
            FilesystemCatalog::new("/absolutely/does/not/exist")
                .names()
                .is_err()
        );
    }

    #[test]
    fn load_reads_layering_and_content_dir() {
        let temp = TempDir::new().unwrap();
        make_template_dir(
            temp.path(),
            "docker",
            r#"{"project_slug": "x", "_layering": {"extends": ["base"], "inherits": ["project_slug"]}}"#,
            &[(CONTENT, "hi")],
        );

        let template = FilesystemCatalog::new(temp.path()).load("docker").unwrap();
        assert!(template.extends().contains("base"));
        assert!(template.inherits().contains("project_slug"));
        assert!(!template.defaults().contains_key("_layering"));
        assert_eq!(
            template.content_dir(),
            temp.path().join("docker/{{cookiecutter.project_slug}}")
        );
    }

    #[test]
    fn load_rejects_missing_manifest() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("bad")).unwrap();
        let err = FilesystemCatalog::new(temp.path()).load("bad").unwrap_err();
        assert!(err.to_string().contains(MANIFEST_FILE));
    }

    #[test]
    fn load_rejects_invalid_json() {
        let temp = TempDir::new().unwrap();
        make_template_dir(temp.path(), "bad", "{not json", &[(CONTENT, "")]);
        assert!(FilesystemCatalog::new(temp.path()).load("bad").is_err());
    }

    #[test]
    fn load_rejects_missing_content_dir() {
        let temp = TempDir::new().unwrap();
        make_template_dir(temp.path(), "empty", "{}", &[("hooks/pre_gen.py", "")]);
        assert!(FilesystemCatalog::new(temp.path()).load("empty").is_err());
    }

    #[test]
    fn load_rejects_ambiguous_content_dirs() {
        let temp = TempDir::new().unwrap();
        make_template_dir(
            temp.path(),
            "two",
            "{}",
            &[(CONTENT, ""), ("{{cookiecutter.other}}/x", "")],
        );
        let err = FilesystemCatalog::new(temp.path()).load("two").unwrap_err();
        assert!(err.to_string().contains("{{cookiecutter.other}}"));
    }
}
