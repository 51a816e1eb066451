//! `lamina config`: expand the requested templates, collect parameters for
//! each layer and write the config document.

use std::{fs, path::Path};

use tracing::{info, instrument};

use lamina_adapters::DefaultsPrompter;
use lamina_core::prelude::{ConfigureService, ExpansionPolicy, Prompter, TemplateSource};

use crate::{
    cli::{ConfigArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(templates = ?args.templates))]
pub fn execute(
    args: ConfigArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let (registry, root) = super::registry(&config, global.root.as_deref());

    let known = registry.list()?;
    if let Some(missing) = args.templates.iter().find(|t| !known.contains(*t)) {
        return Err(CliError::TemplateNotFound {
            name: missing.clone(),
            root,
        });
    }

    let policy = if args.transitive {
        ExpansionPolicy::Transitive
    } else {
        ExpansionPolicy::SingleLevel
    };
    let source = match (args.source_repo, args.source_rev) {
        (Some(repo), Some(rev)) => Some(TemplateSource::new(repo, rev)),
        _ => config.template_source(),
    };

    let service = ConfigureService::new(registry, prompter(args.no_input)?);
    let (expansion, doc) = service.configure(&args.templates, policy, source)?;

    let json = doc.to_json().map_err(lamina_core::error::LaminaError::from)?;

    // Without -o the document itself is the stdout payload, so narration
    // stays in the log.
    match &args.output {
        Some(path) => {
            write_document(path, &json)?;
            if !expansion.added.is_empty() {
                output.info(&format!(
                    "Added dependencies: {}",
                    expansion.added.join(", ")
                ))?;
            }
            output.success(&format!(
                "Wrote {} layer(s) to {}",
                doc.len(),
                path.display()
            ))?;
        }
        None => {
            if !expansion.added.is_empty() {
                info!(added = ?expansion.added, "Added dependencies");
            }
            print!("{json}");
        }
    }

    Ok(())
}

fn write_document(path: &Path, json: &str) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_cli_context(|| format!("creating '{}'", parent.display()))?;
    }
    fs::write(path, json).with_cli_context(|| format!("writing '{}'", path.display()))
}

#[cfg(feature = "interactive")]
fn prompter(no_input: bool) -> CliResult<Box<dyn Prompter>> {
    if no_input {
        Ok(Box::new(DefaultsPrompter::new()))
    } else {
        Ok(Box::new(crate::prompt::DialoguerPrompter::new()))
    }
}

#[cfg(not(feature = "interactive"))]
fn prompter(no_input: bool) -> CliResult<Box<dyn Prompter>> {
    if no_input {
        Ok(Box::new(DefaultsPrompter::new()))
    } else {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }
}
