//! Layer Renderer - renders one configured layer into a private scratch
//! directory and locates the project directory it produced.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, Renderer},
    },
    domain::{Layer, TEMPLATE_KEY, Template},
    error::{LaminaError, LaminaResult},
};

/// Scratch directory name for the layer at `index` (0-based).
pub fn scratch_dir_name(index: usize, layer: &Layer) -> String {
    format!("{index:02}-{}", layer.layer_name())
}

pub struct LayerRenderer<'a> {
    renderer: &'a dyn Renderer,
    filesystem: &'a dyn Filesystem,
}

impl<'a> LayerRenderer<'a> {
    pub fn new(renderer: &'a dyn Renderer, filesystem: &'a dyn Filesystem) -> Self {
        Self {
            renderer,
            filesystem,
        }
    }

    /// Render `layer` under `scratch_root` and return the single top-level
    /// directory the renderer created.
    #[instrument(skip_all, fields(layer = %layer.layer_name(), index = index))]
    pub fn render(
        &self,
        template: &Template,
        layer: &Layer,
        index: usize,
        scratch_root: &Path,
    ) -> LaminaResult<PathBuf> {
        let out = scratch_root.join(scratch_dir_name(index, layer));
        self.filesystem.create_dir_all(&out)?;

        let mut context = layer.params().clone();
        context.insert(
            TEMPLATE_KEY.to_string(),
            Value::String(template.content_dir().display().to_string()),
        );

        self.renderer
            .render(template, &context, &out)
            .map_err(|e| match e {
                LaminaError::Application(ApplicationError::RenderFailed { .. }) => e,
                other => ApplicationError::RenderFailed {
                    layer: layer.layer_name().to_string(),
                    reason: other.to_string(),
                }
                .into(),
            })?;

        let entries = self.filesystem.read_dir(&out)?;
        match entries.as_slice() {
            [single] => {
                debug!(project = %single.display(), "Layer rendered");
                Ok(single.clone())
            }
            [] => Err(ApplicationError::RenderFailed {
                layer: layer.layer_name().to_string(),
                reason: "renderer produced no output".into(),
            }
            .into()),
            many => Err(ApplicationError::RenderFailed {
                layer: layer.layer_name().to_string(),
                reason: format!(
                    "renderer produced {} top-level entries, expected one directory",
                    many.len()
                ),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockRenderer};
    use crate::domain::Params;
    use serde_json::json;

    fn template() -> Template {
        Template::from_manifest(
            "base",
            "/t/base",
            json!({"layer": "svc"}),
            vec!["/t/base/{{cookiecutter.project_slug}}".into()],
        )
        .unwrap()
    }

    fn layer() -> Layer {
        Layer::new("base", 1, "svc", Params::new())
    }

    fn filesystem(entries: Vec<PathBuf>) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_read_dir().returning(move |_| Ok(entries.clone()));
        fs
    }

    #[test]
    fn renders_into_numbered_scratch_dir() {
        let mut renderer = MockRenderer::new();
        renderer
            .expect_render()
            .withf(|_, ctx, out| {
                ctx[TEMPLATE_KEY] == json!("/t/base/{{cookiecutter.project_slug}}")
                    && ctx["layer"] == json!("svc")
                    && out == Path::new("/scratch/03-svc")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        let fs = filesystem(vec!["/scratch/03-svc/myproj".into()]);

        let project = LayerRenderer::new(&renderer, &fs)
            .render(&template(), &layer(), 3, Path::new("/scratch"))
            .unwrap();
        assert_eq!(project, PathBuf::from("/scratch/03-svc/myproj"));
    }

    #[test]
    fn empty_output_is_a_render_error() {
        let mut renderer = MockRenderer::new();
        renderer.expect_render().returning(|_, _, _| Ok(()));
        let fs = filesystem(vec![]);

        let err = LayerRenderer::new(&renderer, &fs)
            .render(&template(), &layer(), 0, Path::new("/scratch"))
            .unwrap_err();
        assert!(err.to_string().contains("no output"));
    }

    #[test]
    fn several_top_level_entries_is_a_render_error() {
        let mut renderer = MockRenderer::new();
        renderer.expect_render().returning(|_, _, _| Ok(()));
        let fs = filesystem(vec!["/s/00-svc/a".into(), "/s/00-svc/b".into()]);

        let err = LayerRenderer::new(&renderer, &fs)
            .render(&template(), &layer(), 0, Path::new("/s"))
            .unwrap_err();
        assert!(matches!(
            err,
            LaminaError::Application(ApplicationError::RenderFailed { .. })
        ));
    }

    #[test]
    fn renderer_failure_is_wrapped() {
        let mut renderer = MockRenderer::new();
        renderer.expect_render().returning(|_, _, _| {
            Err(ApplicationError::FilesystemError {
                path: "/t/base".into(),
                reason: "denied".into(),
            }
            .into())
        });
        let fs = filesystem(vec![]);

        let err = LayerRenderer::new(&renderer, &fs)
            .render(&template(), &layer(), 0, Path::new("/s"))
            .unwrap_err();
        assert!(err.to_string().starts_with("Rendering layer 'svc' failed"));
    }
}
