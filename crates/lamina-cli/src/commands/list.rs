//! Implementation of the `lamina list` command.

use tracing::warn;

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let (registry, root) = super::registry(&config, global.root.as_deref());
    let names = registry.list()?;

    match args.format {
        ListFormat::Table => {
            if names.is_empty() {
                output.warning(&format!("No templates found under {}", root.display()))?;
                return Ok(());
            }
            output.header(&format!("Templates in {}:", root.display()))?;
            let width = names.iter().map(String::len).max().unwrap_or(0);
            for name in &names {
                let line = match registry.resolve(name) {
                    Ok(template) if template.extends().is_empty() => format!("  {name}"),
                    Ok(template) => format!(
                        "  {name:<width$}  extends {}",
                        template
                            .extends()
                            .iter()
                            .cloned()
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                    Err(e) => {
                        warn!(template = %name, error = %e, "Template failed to load");
                        format!("  {name:<width$}  (invalid: {e})")
                    }
                };
                output.print(&line)?;
            }
        }

        ListFormat::List => {
            for name in &names {
                println!("{name}");
            }
        }

        // Written straight to stdout so pipes get parseable JSON even in
        // quiet mode.
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&names)
                .map_err(std::io::Error::from)
                .with_cli_context(|| "serialising template list")?;
            println!("{json}");
        }
    }

    Ok(())
}
