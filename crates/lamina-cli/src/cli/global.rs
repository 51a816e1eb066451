//! Flags accepted before or after any subcommand.

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Repeatable; see [`crate::logging`] for the level each count selects.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Only warnings and errors
    -v      - Info level (progress messages)
    -vv     - Debug level (detailed diagnostics)
    -vvv    - Trace level (very verbose)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Also set by a non-empty `NO_COLOR`.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Settings file; replaces the per-user default location.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    /// Directory holding one sub-directory per template.
    ///
    /// Falls back to `templates.root` from the configuration, then to the
    /// current directory.
    #[arg(
        short = 'r',
        long = "root",
        global = true,
        value_name = "DIR",
        env = "LAMINA_ROOT",
        help = "Template root directory"
    )]
    pub root: Option<PathBuf>,

    /// Also write JSON logs to this file.
    #[arg(
        long = "log-file",
        global = true,
        value_name = "FILE",
        help = "Write structured JSON logs to FILE"
    )]
    pub log_file: Option<PathBuf>,
}
