//! Build Service - renders a config document into a project directory.
//!
//! Workflow:
//! 1. Resolve each layer's template
//! 2. Render every layer into its own scratch directory
//! 3. Stage the rendered trees in layer order
//! 4. Promote the staged tree to the output directory

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ports::{Filesystem, Renderer},
        services::{
            layer_renderer::LayerRenderer,
            merge_engine::{MergeEngine, Placement, RenderedLayer},
            registry::TemplateRegistry,
        },
    },
    domain::{ConfigDocument, DomainValidator},
    error::LaminaResult,
};

/// Sub-directory of the scratch root holding one directory per layer.
pub const LAYERS_DIR: &str = "layers";

/// Sub-directory of the scratch root holding the merged tree.
pub const STAGE_DIR: &str = "stage";

/// Options controlling where and how a build is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub overwrite: bool,
    pub placement: Placement,
}

impl BuildOptions {
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}

/// Renders and merges config documents.
pub struct BuildService {
    registry: Arc<TemplateRegistry>,
    renderer: Box<dyn Renderer>,
    filesystem: Arc<dyn Filesystem>,
}

impl BuildService {
    pub fn new(
        registry: Arc<TemplateRegistry>,
        renderer: Box<dyn Renderer>,
        filesystem: Arc<dyn Filesystem>,
    ) -> Self {
        Self {
            registry,
            renderer,
            filesystem,
        }
    }

    /// Build `doc` into `output_dir`, using `scratch_root` for intermediate
    /// trees. Returns the final project path.
    ///
    /// `scratch_root` must be private to this build; the caller owns its
    /// lifetime.
    #[instrument(
        skip_all,
        fields(
            layers = doc.len(),
            output = %output_dir.display(),
            overwrite = options.overwrite
        )
    )]
    pub fn build(
        &self,
        doc: &ConfigDocument,
        output_dir: &Path,
        options: BuildOptions,
        scratch_root: &Path,
    ) -> LaminaResult<PathBuf> {
        DomainValidator::validate_document(doc)?;

        let fs = self.filesystem.as_ref();
        let merger = MergeEngine::new(fs);
        if options.placement == Placement::Inline {
            merger.check_destination(output_dir, options.overwrite)?;
        }

        let layer_renderer = LayerRenderer::new(self.renderer.as_ref(), fs);
        let layers_root = scratch_root.join(LAYERS_DIR);
        let mut rendered = Vec::with_capacity(doc.len());

        for (index, layer) in doc.layers().iter().enumerate() {
            let template = self.registry.resolve(layer.name())?;
            let project_dir = layer_renderer.render(&template, layer, index, &layers_root)?;
            let rendered_layer = RenderedLayer {
                layer_name: layer.layer_name().to_string(),
                project_dir,
            };

            if index == 0 && options.placement == Placement::Nested {
                let destination = MergeEngine::destination(
                    output_dir,
                    &rendered_layer.top_level_name(),
                    Placement::Nested,
                );
                merger.check_destination(&destination, options.overwrite)?;
            }
            rendered.push(rendered_layer);
        }
        info!(layers = rendered.len(), "All layers rendered");

        let staged = merger.stage(&rendered, &scratch_root.join(STAGE_DIR))?;
        merger.promote(&staged, output_dir, options.placement, options.overwrite)
    }
}
