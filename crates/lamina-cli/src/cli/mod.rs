//! Command-line surface of `lamina`. Handlers live in `crate::commands`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "lamina",
    bin_name = "lamina",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Compose layered project templates",
    long_about = "Lamina stacks independently maintained cookiecutter templates \
                  (a base plus add-ons such as docker or ci) into one project, \
                  and re-applies updated templates onto an existing repository.",
    after_help = "EXAMPLES:\n\
        \x20 lamina --root ./templates list\n\
        \x20 lamina config python-base docker -o layers.json\n\
        \x20 lamina build layers.json -o ./out\n\
        \x20 lamina upgrade layers.json --branch template-updates",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List available templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 lamina list\n\
            \x20 lamina list --format json"
    )]
    List(ListArgs),

    /// Collect parameters for each layer and write a config document.
    #[command(
        about = "Configure layers and write a config document",
        after_help = "EXAMPLES:\n\
            \x20 lamina config docker                 # adds 'base' if docker extends it\n\
            \x20 lamina config base ci -o layers.json\n\
            \x20 lamina config docker --no-input --transitive"
    )]
    Config(ConfigArgs),

    /// Render and merge the layers of a config document.
    #[command(
        visible_alias = "b",
        about = "Build a project from a config document",
        after_help = "EXAMPLES:\n\
            \x20 lamina build layers.json\n\
            \x20 lamina build layers.json -o ./out --overwrite"
    )]
    Build(BuildArgs),

    /// Re-apply templates onto a branch of an existing repository.
    #[command(
        about = "Commit regenerated templates onto a branch",
        after_help = "EXAMPLES:\n\
            \x20 lamina upgrade layers.json --branch template\n\
            \x20 lamina upgrade layers.json --branch template --project-dir ../app --remote"
    )]
    Upgrade(UpgradeArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 lamina completions bash > ~/.local/share/bash-completion/completions/lamina\n\
            \x20 lamina completions zsh  > ~/.zfunc/_lamina\n\
            \x20 lamina completions fish > ~/.config/fish/completions/lamina.fish"
    )]
    Completions(CompletionsArgs),
}

/// Arguments for `lamina list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// How `lamina list` prints the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

/// Arguments for `lamina config`.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Templates to layer, in order.  Repeats are allowed.
    #[arg(value_name = "TEMPLATE", required = true, help = "Templates to layer")]
    pub templates: Vec<String>,

    /// Where to write the config document (stdout when omitted).
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write the config document to FILE"
    )]
    pub output: Option<PathBuf>,

    /// Accept template defaults without prompting.
    #[arg(long = "no-input", help = "Use defaults without prompting")]
    pub no_input: bool,

    /// Follow `extends` through dependencies of dependencies.
    #[arg(long = "transitive", help = "Add dependencies transitively")]
    pub transitive: bool,

    /// Repository the templates were taken from.
    #[arg(
        long = "source-repo",
        value_name = "URL",
        requires = "source_rev",
        help = "Record the template repository in the document"
    )]
    pub source_repo: Option<String>,

    /// Revision of that repository.
    #[arg(
        long = "source-rev",
        value_name = "REV",
        requires = "source_repo",
        help = "Record the template revision in the document"
    )]
    pub source_rev: Option<String>,
}

/// Arguments for `lamina build`.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Config document produced by `lamina config`.
    #[arg(value_name = "CONFIG", help = "Config document")]
    pub document: PathBuf,

    /// Directory the project directory is created in.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        default_value = ".",
        help = "Output directory"
    )]
    pub output: PathBuf,

    /// Write into an existing project directory.
    #[arg(long = "overwrite", help = "Overwrite an existing project directory")]
    pub overwrite: bool,
}

/// Arguments for `lamina upgrade`.
#[derive(Debug, Args)]
pub struct UpgradeArgs {
    /// Config document describing the layers.
    #[arg(value_name = "CONFIG", help = "Config document")]
    pub document: PathBuf,

    /// Branch receiving the regenerated templates.
    #[arg(short = 'b', long = "branch", value_name = "BRANCH", help = "Target branch")]
    pub branch: String,

    /// Repository to upgrade.
    #[arg(
        short = 'p',
        long = "project-dir",
        value_name = "DIR",
        default_value = ".",
        help = "Project repository"
    )]
    pub project_dir: PathBuf,

    /// Run `git fetch --all` first.
    #[arg(long = "remote", help = "Fetch all remotes before upgrading")]
    pub remote: bool,

    /// Override the template repository recorded in the document.
    #[arg(
        long = "source-repo",
        value_name = "URL",
        requires = "source_rev",
        help = "Template repository for the commit message"
    )]
    pub source_repo: Option<String>,

    /// Override the template revision recorded in the document.
    #[arg(
        long = "source-rev",
        value_name = "REV",
        requires = "source_repo",
        help = "Template revision for the commit message"
    )]
    pub source_rev: Option<String>,
}

/// Arguments for `lamina completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
