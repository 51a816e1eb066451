//! Rendering adapters.

use std::sync::LazyLock;

use regex::Regex;

mod cookiecutter;
mod simple;

pub use cookiecutter::CookiecutterRenderer;
pub use simple::SimpleRenderer;

/// `{{ cookiecutter.<key> }}`, capturing the key.
pub(crate) static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*cookiecutter\.(\w+)\s*\}\}").expect("placeholder pattern is valid")
});
