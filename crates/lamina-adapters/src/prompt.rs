//! Non-interactive prompter.

use serde_json::Value;
use tracing::debug;

use lamina_core::{
    application::ports::Prompter,
    domain::{Params, Template},
    error::LaminaResult,
};

use crate::renderer::PLACEHOLDER;

/// Accepts every default without asking.
///
/// Choice lists resolve to their first entry and simple
/// `{{ cookiecutter.<key> }}` references to earlier answers are filled in,
/// the way cookiecutter treats defaults under `--no-input`. Keys starting
/// with `_` and object values pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultsPrompter;

impl DefaultsPrompter {
    pub fn new() -> Self {
        Self
    }
}

/// Resolve one default against the answers collected so far.
///
/// Shared with interactive prompters so both treat defaults alike.
pub fn resolve_default(value: &Value, answered: &Params) -> Value {
    match value {
        Value::Array(choices) => choices
            .first()
            .map(|first| resolve_default(first, answered))
            .unwrap_or(Value::Null),
        Value::String(text) => Value::String(
            PLACEHOLDER
                .replace_all(text, |caps: &regex::Captures| {
                    match answered.get(&caps[1]) {
                        Some(Value::String(s)) => s.clone(),
                        Some(other) => other.to_string(),
                        None => caps[0].to_string(),
                    }
                })
                .into_owned(),
        ),
        other => other.clone(),
    }
}

/// `true` for keys that are never asked for.
pub fn is_private_key(key: &str) -> bool {
    key.starts_with('_')
}

impl Prompter for DefaultsPrompter {
    fn prompt(&self, template: &Template, context: Params) -> LaminaResult<Params> {
        let mut answered = Params::new();
        for (key, value) in context {
            let value = if is_private_key(&key) {
                value
            } else {
                resolve_default(&value, &answered)
            };
            answered.insert(key, value);
        }
        debug!(template = %template.name(), keys = answered.len(), "Defaults accepted");
        Ok(answered)
    }
}
