//! `lamina build`: render and merge the layers of a config document.

use std::sync::Arc;

use tempfile::TempDir;
use tracing::{info, instrument};

use lamina_adapters::LocalFilesystem;
use lamina_core::prelude::{BuildOptions, BuildService};

use crate::{
    cli::{BuildArgs, GlobalArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(document = %args.document.display(), output = %args.output.display()))]
pub fn execute(
    args: BuildArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let doc = super::read_document(&args.document)?;
    let (registry, _) = super::registry(&config, global.root.as_deref());
    let service = BuildService::new(
        registry,
        super::renderer(&config),
        Arc::new(LocalFilesystem::new()),
    );

    let scratch = TempDir::with_prefix("lamina-").with_cli_context(|| "creating scratch directory")?;
    let options = BuildOptions::default().overwrite(args.overwrite);

    let spinner = output.spinner(&format!("Rendering {} layer(s)...", doc.len()));
    let result = service.build(&doc, &args.output, options, scratch.path());
    spinner.finish_and_clear();
    let project = result?;

    info!(project = %project.display(), "Build finished");
    output.success(&format!("Project written to {}", project.display()))?;
    Ok(())
}
