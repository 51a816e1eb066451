//! `lamina upgrade`: regenerate the templates on a branch of an existing
//! repository and commit the result.

use std::{fs, sync::Arc};

use tempfile::TempDir;
use tracing::instrument;

use lamina_adapters::{GitCli, LocalFilesystem};
use lamina_core::prelude::{
    BuildService, Filesystem, TemplateSource, UpgradeRequest, UpgradeService,
};

use crate::{
    cli::{GlobalArgs, UpgradeArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(branch = %args.branch, project = %args.project_dir.display()))]
pub fn execute(
    args: UpgradeArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let doc = super::read_document(&args.document)?;

    // git resolves the worktree path against the repository, so hand it an
    // absolute one.
    let project_dir = fs::canonicalize(&args.project_dir).map_err(|e| CliError::InvalidInput {
        message: format!(
            "project directory '{}' is not accessible",
            args.project_dir.display()
        ),
        source: Some(Box::new(e)),
    })?;

    let (registry, _) = super::registry(&config, global.root.as_deref());
    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let builder = BuildService::new(registry, super::renderer(&config), Arc::clone(&filesystem));
    let service = UpgradeService::new(
        builder,
        Box::new(GitCli::new()),
        Box::new(config.hook()),
        filesystem,
    )
    .with_settings(config.upgrade_settings());

    // Flags, then the document, then the configured source.
    let source = match (args.source_repo, args.source_rev) {
        (Some(repo), Some(rev)) => Some(TemplateSource::new(repo, rev)),
        _ if doc.source().is_none() => config.template_source(),
        _ => None,
    };
    let request = UpgradeRequest {
        project_dir,
        branch: args.branch,
        remote: args.remote,
        source,
    };

    let scratch = TempDir::with_prefix("lamina-").with_cli_context(|| "creating scratch directory")?;
    output.header(&format!("Upgrading branch '{}'", request.branch))?;

    let spinner = output.spinner("Rendering templates and running the validation hook...");
    let result = service.upgrade(&doc, &request, scratch.path());
    spinner.finish_and_clear();
    let message = result?;

    output.success(&format!("Committed \"{message}\" on '{}'", request.branch))?;
    Ok(())
}
