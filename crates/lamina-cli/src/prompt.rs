//! Terminal prompter built on `dialoguer`.
//!
//! Asks for every public key of a layer in manifest order. Strings become
//! text inputs, booleans a confirm, arrays a select whose first entry is the
//! default. Defaults that reference earlier answers
//! (`{{ cookiecutter.project_name }}`) are resolved before being offered.

use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use serde_json::Value;
use tracing::debug;

use lamina_adapters::prompt::{is_private_key, resolve_default};
use lamina_core::{
    application::ApplicationError,
    prelude::{LaminaResult, Params, Prompter, Template},
};

/// Interactive [`Prompter`] for the `config` command.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn ask(&self, label: &str, default: &Value, raw: &Value) -> Result<Value, dialoguer::Error> {
        match raw {
            Value::Array(choices) if !choices.is_empty() => {
                let labels: Vec<String> = choices.iter().map(display_value).collect();
                let index = Select::with_theme(&self.theme)
                    .with_prompt(label)
                    .items(&labels)
                    .default(0)
                    .interact()?;
                Ok(choices[index].clone())
            }
            Value::Bool(_) => Confirm::with_theme(&self.theme)
                .with_prompt(label)
                .default(default.as_bool().unwrap_or(false))
                .interact()
                .map(Value::Bool),
            _ => {
                let answer: String = Input::with_theme(&self.theme)
                    .with_prompt(label)
                    .default(display_value(default))
                    .allow_empty(true)
                    .interact_text()?;
                Ok(parse_answer(&answer, default))
            }
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn prompt(&self, template: &Template, context: Params) -> LaminaResult<Params> {
        let mut answered = Params::new();
        for (key, raw) in context {
            let value = if is_private_key(&key) || raw.is_object() {
                raw
            } else {
                let default = resolve_default(&raw, &answered);
                let label = format!("[{}] {key}", template.name());
                self.ask(&label, &default, &raw)
                    .map_err(|e| ApplicationError::PromptFailed {
                        template: template.name().to_string(),
                        reason: e.to_string(),
                    })?
            };
            answered.insert(key, value);
        }
        debug!(template = %template.name(), keys = answered.len(), "Parameters collected");
        Ok(answered)
    }
}

/// Text shown for a default or a choice.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Keep numbers numeric when the default was a number.
fn parse_answer(answer: &str, default: &Value) -> Value {
    if default.is_number() {
        if let Ok(number) = serde_json::from_str::<serde_json::Number>(answer.trim()) {
            return Value::Number(number);
        }
    }
    Value::String(answer.to_string())
}
