//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into calls on the core services and print
//! results. Adapter wiring shared between commands lives here.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use lamina_adapters::{CookiecutterRenderer, FilesystemCatalog, SimpleRenderer};
use lamina_core::prelude::{ConfigDocument, Renderer, TemplateRegistry};

use crate::{
    config::{AppConfig, RendererKind},
    error::{CliError, CliResult, IntoCli},
};

pub mod build;
pub mod completions;
pub mod config;
pub mod list;
pub mod upgrade;

/// Registry over the template root chosen by `--root` or the configuration.
pub(crate) fn registry(config: &AppConfig, root: Option<&Path>) -> (Arc<TemplateRegistry>, PathBuf) {
    let root = config.template_root(root);
    let catalog = FilesystemCatalog::new(&root);
    (Arc::new(TemplateRegistry::new(Box::new(catalog))), root)
}

pub(crate) fn renderer(config: &AppConfig) -> Box<dyn Renderer> {
    match config.build.renderer {
        RendererKind::Simple => Box::new(SimpleRenderer::new()),
        RendererKind::Cookiecutter => Box::new(CookiecutterRenderer::new()),
    }
}

/// Read and parse a config document written by `lamina config`.
pub(crate) fn read_document(path: &Path) -> CliResult<ConfigDocument> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CliError::DocumentNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(e).with_cli_context(|| format!("reading '{}'", path.display()));
        }
    };
    Ok(ConfigDocument::from_json(&raw).map_err(lamina_core::error::LaminaError::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_document_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = read_document(&temp.path().join("layers.json")).unwrap_err();
        assert!(matches!(err, CliError::DocumentNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn malformed_document_is_a_user_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("layers.json");
        fs::write(&path, "{not json").unwrap();
        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, CliError::Core(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn root_flag_selects_catalog() {
        let (_, root) = registry(&AppConfig::default(), Some(Path::new("/srv/t")));
        assert_eq!(root, PathBuf::from("/srv/t"));
    }
}
