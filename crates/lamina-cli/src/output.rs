//! Terminal narration for the commands.

use std::{
    io::{self, IsTerminal},
    time::Duration,
};

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::cli::GlobalArgs;
use crate::config::AppConfig;

/// Writes progress narration to stdout, honouring `--quiet` and colour
/// settings. Error reports go to stderr from `main`.
pub struct OutputManager {
    quiet: bool,
    no_color: bool,
    interactive: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        Self {
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            interactive: io::stdout().is_terminal(),
            term: Term::stdout(),
        }
    }

    fn emit(&self, line: impl FnOnce(bool) -> String) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&line(!self.no_color))
    }

    fn marked(&self, marker: Marker, msg: &str) -> io::Result<()> {
        self.emit(|color| match (color, marker) {
            (false, _) => format!("{} {msg}", marker.symbol()),
            (true, Marker::Success) => format!("{} {}", marker.symbol().green().bold(), msg.green()),
            (true, Marker::Warning) => {
                format!("{} {}", marker.symbol().yellow().bold(), msg.yellow())
            }
            (true, Marker::Info) => format!("{} {}", marker.symbol().blue().bold(), msg.blue()),
        })
    }

    /// Unadorned narration; nothing in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.emit(|_| msg.to_owned())
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked(Marker::Success, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked(Marker::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked(Marker::Info, msg)
    }

    /// Section title, bold cyan when coloured.
    pub fn header(&self, text: &str) -> io::Result<()> {
        self.emit(|color| {
            if color {
                text.cyan().bold().to_string()
            } else {
                text.to_owned()
            }
        })
    }

    /// Spinner shown while rendering or upgrading. Hidden in quiet mode and
    /// when stdout is piped.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet || !self.interactive {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(msg.to_owned());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

#[derive(Clone, Copy)]
enum Marker {
    Success,
    Warning,
    Info,
}

impl Marker {
    fn symbol(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}",
            Self::Warning => "\u{26a0}",
            Self::Info => "\u{2139}",
        }
    }
}
