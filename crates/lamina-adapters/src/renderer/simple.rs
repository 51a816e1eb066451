//! Simple variable substitution renderer.
//!
//! Replaces `{{ cookiecutter.<key> }}` placeholders in path segments and in
//! UTF-8 file contents. Binary files are copied verbatim. There are no
//! filters, conditionals or loops; templates that need them go through
//! [`super::CookiecutterRenderer`].

use std::{
    borrow::Cow,
    fs,
    path::{Component, Path, PathBuf},
};

use regex::Captures;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use lamina_core::{
    application::{ApplicationError, ports::Renderer},
    domain::{LAYER_KEY, Params, Template},
    error::{LaminaError, LaminaResult},
};

use super::PLACEHOLDER;
use crate::filesystem::map_io_error;

/// Simple renderer using basic variable substitution.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRenderer;

impl SimpleRenderer {
    /// Create a new simple renderer.
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for SimpleRenderer {
    #[instrument(skip_all, fields(template = %template.name(), output = %output_dir.display()))]
    fn render(&self, template: &Template, context: &Params, output_dir: &Path) -> LaminaResult<()> {
        let layer = context
            .get(LAYER_KEY)
            .and_then(Value::as_str)
            .unwrap_or(template.name())
            .to_string();
        let subst = Substitution {
            context,
            layer: &layer,
        };

        let content_dir = template.content_dir();
        let top = content_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let project_root = output_dir.join(subst.segment(&top)?);

        let mut files = 0usize;
        for entry in WalkDir::new(content_dir) {
            let entry = entry.map_err(|e| subst.fail(format!("directory walk error: {e}")))?;
            let rel = entry
                .path()
                .strip_prefix(content_dir)
                .map_err(|e| subst.fail(e.to_string()))?;
            let dest = subst.dest_path(&project_root, rel)?;

            let file_type = entry.file_type();
            if file_type.is_dir() {
                fs::create_dir_all(&dest).map_err(|e| map_io_error(&dest, e, "create directory"))?;
            } else if file_type.is_file() {
                render_file(&subst, entry.path(), &dest)?;
                files += 1;
            } else {
                copy_special(entry.path(), &dest)?;
            }
        }

        debug!(files, project = %project_root.display(), "Template rendered");
        Ok(())
    }
}

struct Substitution<'a> {
    context: &'a Params,
    layer: &'a str,
}

impl Substitution<'_> {
    fn fail(&self, reason: impl Into<String>) -> LaminaError {
        ApplicationError::RenderFailed {
            layer: self.layer.to_string(),
            reason: reason.into(),
        }
        .into()
    }

    /// Replace every placeholder in `text`; unknown variables are an error.
    fn apply<'t>(&self, text: &'t str) -> LaminaResult<Cow<'t, str>> {
        let mut missing: Option<String> = None;
        let rendered = PLACEHOLDER.replace_all(text, |caps: &Captures| {
            let key = &caps[1];
            match self.context.get(key) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => {
                    missing.get_or_insert_with(|| key.to_string());
                    String::new()
                }
            }
        });
        match missing {
            Some(key) => Err(self.fail(format!("undefined variable 'cookiecutter.{key}'"))),
            None => Ok(rendered),
        }
    }

    fn dest_path(&self, project_root: &Path, rel: &Path) -> LaminaResult<PathBuf> {
        let mut dest = project_root.to_path_buf();
        for component in rel.components() {
            dest.push(self.segment(&component.as_os_str().to_string_lossy())?);
        }
        Ok(dest)
    }

    /// Render one path segment. The result must stay a single plain name so
    /// a parameter value cannot move output out of the layer directory.
    fn segment(&self, raw: &str) -> LaminaResult<String> {
        let rendered = self.apply(raw)?.into_owned();
        let mut components = Path::new(&rendered).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) && !rendered.contains(['/', '\\']);
        if plain {
            Ok(rendered)
        } else {
            Err(self.fail(format!(
                "path segment '{raw}' renders to '{rendered}', which is not a plain file name"
            )))
        }
    }
}

fn render_file(subst: &Substitution<'_>, src: &Path, dest: &Path) -> LaminaResult<()> {
    let bytes = fs::read(src).map_err(|e| map_io_error(src, e, "read template file"))?;
    let output = match String::from_utf8(bytes) {
        Ok(text) => subst.apply(&text)?.into_owned().into_bytes(),
        Err(binary) => binary.into_bytes(),
    };
    fs::write(dest, output).map_err(|e| map_io_error(dest, e, "write file"))?;

    let permissions = fs::metadata(src)
        .map_err(|e| map_io_error(src, e, "read metadata"))?
        .permissions();
    fs::set_permissions(dest, permissions).map_err(|e| map_io_error(dest, e, "set permissions"))
}

/// Symlinks are reproduced so later stages see them as they are in the
/// template.
#[cfg(unix)]
fn copy_special(src: &Path, dest: &Path) -> LaminaResult<()> {
    match fs::read_link(src) {
        Ok(target) => std::os::unix::fs::symlink(&target, dest)
            .map_err(|e| map_io_error(dest, e, "create symlink")),
        Err(_) => {
            warn!(path = %src.display(), "Skipping special file");
            Ok(())
        }
    }
}

#[cfg(not(unix))]
fn copy_special(src: &Path, _dest: &Path) -> LaminaResult<()> {
    warn!(path = %src.display(), "Skipping special file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn template_at(root: &Path) -> Template {
        Template::from_manifest(
            "base",
            root,
            json!({}),
            vec![root.join("{{cookiecutter.project_slug}}")],
        )
        .unwrap()
    }

    fn params(v: Value) -> Params {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn substitutes_paths_and_contents() {
        let tpl = TempDir::new().unwrap();
        let content = tpl.path().join("{{cookiecutter.project_slug}}");
        fs::create_dir_all(content.join("{{ cookiecutter.pkg }}")).unwrap();
        fs::write(
            content.join("{{ cookiecutter.pkg }}/__init__.py"),
            "VERSION = \"{{ cookiecutter.version }}\"\n",
        )
        .unwrap();

        let out = TempDir::new().unwrap();
        SimpleRenderer
            .render(
                &template_at(tpl.path()),
                &params(json!({"layer": "svc", "project_slug": "myproj", "pkg": "app", "version": 2})),
                out.path(),
            )
            .unwrap();

        let rendered = out.path().join("myproj/app/__init__.py");
        assert_eq!(fs::read_to_string(rendered).unwrap(), "VERSION = \"2\"\n");
    }

    #[test]
    fn binary_files_are_copied_verbatim() {
        let tpl = TempDir::new().unwrap();
        let content = tpl.path().join("{{cookiecutter.project_slug}}");
        fs::create_dir_all(&content).unwrap();
        let blob = [0xff, 0xfe, b'{', b'{', 0x00];
        fs::write(content.join("logo.bin"), blob).unwrap();

        let out = TempDir::new().unwrap();
        SimpleRenderer
            .render(
                &template_at(tpl.path()),
                &params(json!({"project_slug": "p"})),
                out.path(),
            )
            .unwrap();
        assert_eq!(fs::read(out.path().join("p/logo.bin")).unwrap(), blob);
    }

    #[test]
    fn undefined_variable_fails() {
        let tpl = TempDir::new().unwrap();
        let content = tpl.path().join("{{cookiecutter.project_slug}}");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("a.txt"), "{{ cookiecutter.nope }}").unwrap();

        let out = TempDir::new().unwrap();
        let err = SimpleRenderer
            .render(
                &template_at(tpl.path()),
                &params(json!({"layer": "svc", "project_slug": "p"})),
                out.path(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("cookiecutter.nope"));
        assert!(err.to_string().contains("'svc'"));
    }

    #[test]
    fn path_values_cannot_escape_the_output_dir() {
        let tpl = TempDir::new().unwrap();
        let content = tpl.path().join("{{cookiecutter.project_slug}}");
        fs::create_dir_all(content.join("{{cookiecutter.pkg}}")).unwrap();
        fs::write(content.join("{{cookiecutter.pkg}}/a.txt"), "a").unwrap();

        let scratch = TempDir::new().unwrap();
        let out = scratch.path().join("layers/00-svc");
        fs::create_dir_all(&out).unwrap();
        let outside = scratch.path().join("pwned");

        for (slug, pkg) in [
            (outside.to_string_lossy().into_owned(), "app".to_string()),
            ("../../pwned".to_string(), "app".to_string()),
            ("nested/pwned".to_string(), "app".to_string()),
            ("..".to_string(), "app".to_string()),
            (String::new(), "app".to_string()),
            ("myproj".to_string(), "../../../pwned".to_string()),
        ] {
            let err = SimpleRenderer
                .render(
                    &template_at(tpl.path()),
                    &params(json!({"layer": "svc", "project_slug": slug, "pkg": pkg})),
                    &out,
                )
                .unwrap_err();
            assert!(err.to_string().contains("not a plain file name"), "{slug:?} {pkg:?}: {err}");
        }
        assert!(!outside.exists());
        assert!(!scratch.path().join("layers/pwned").exists());
    }
}
