//! Configure Service - turns requested template names into a config document.
//!
//! Workflow:
//! 1. Expand the requested list with declared dependencies
//! 2. Build each layer's starting context (defaults, identifier, inherited values)
//! 3. Ask the prompter for the final parameters
//! 4. Feed the result into the shared pool for later layers

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    application::{ports::Prompter, services::registry::TemplateRegistry},
    domain::{
        ConfigDocument, Expansion, ExpansionPolicy, LAYER_KEY, Layer, SharedVariablePool,
        TemplateSource, expand, layer_identifier,
    },
    error::{LaminaError, LaminaResult},
};

/// Layer configuration service.
pub struct ConfigureService {
    registry: Arc<TemplateRegistry>,
    prompter: Box<dyn Prompter>,
}

impl ConfigureService {
    pub fn new(registry: Arc<TemplateRegistry>, prompter: Box<dyn Prompter>) -> Self {
        Self { registry, prompter }
    }

    /// Expand `requested` under `policy` and configure one layer per entry.
    ///
    /// The returned [`Expansion`] tells the caller which dependencies were
    /// added. Any prompt failure aborts the whole run.
    #[instrument(skip_all, fields(requested = ?requested, policy = ?policy))]
    pub fn configure(
        &self,
        requested: &[String],
        policy: ExpansionPolicy,
        source: Option<TemplateSource>,
    ) -> LaminaResult<(Expansion, ConfigDocument)> {
        let expansion = expand::<LaminaError, _>(requested, policy, |name| {
            self.registry.extends_of(name)
        })?;
        if expansion.is_expanded() {
            info!(added = ?expansion.added, "Added template dependencies");
        }

        let mut pool = SharedVariablePool::new();
        let mut counters: HashMap<&str, usize> = HashMap::new();
        let mut doc = ConfigDocument::new().with_source(source);

        for name in &expansion.templates {
            let template = self.registry.resolve(name)?;

            let instance = counters.entry(name.as_str()).or_insert(0);
            *instance += 1;
            let layer_id = layer_identifier(template.default_layer_id(), *instance);

            let mut context = template.defaults().clone();
            context.insert(LAYER_KEY.to_string(), Value::String(layer_id.clone()));
            let injected = pool.inject(&mut context, template.inherits());
            if !injected.is_empty() {
                debug!(layer = %layer_id, inherited = ?injected, "Inherited shared variables");
            }

            let params = self.prompter.prompt(&template, context)?;
            let layer = Layer::new(name.clone(), *instance, layer_id, params);
            pool.absorb(layer.params());

            info!(template = %name, layer = %layer.layer_name(), "Layer configured");
            doc.push(layer);
        }

        Ok((expansion, doc))
    }
}
