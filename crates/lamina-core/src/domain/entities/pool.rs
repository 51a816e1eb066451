use std::collections::BTreeSet;

use serde_json::Value;

use crate::domain::entities::layer::{Params, is_layer_private};

/// Variables accumulated across layers in processing order.
///
/// The pool absorbs every public variable of every finished layer; a template
/// only sees the names it lists in `inherits`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedVariablePool {
    vars: Params,
}

impl SharedVariablePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a finished layer's parameters, later values replacing earlier ones.
    pub fn absorb(&mut self, params: &Params) {
        for (key, value) in params {
            if is_layer_private(key) {
                continue;
            }
            self.vars.insert(key.clone(), value.clone());
        }
    }

    /// Overwrite `context` entries for every inherited name the pool knows.
    /// Returns the names that were injected.
    pub fn inject(&self, context: &mut Params, inherits: &BTreeSet<String>) -> Vec<String> {
        let mut injected = Vec::new();
        for name in inherits {
            if let Some(value) = self.vars.get(name) {
                context.insert(name.clone(), value.clone());
                injected.push(name.clone());
            }
        }
        injected
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(v: Value) -> Params {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn absorb_skips_private_keys() {
        let mut pool = SharedVariablePool::new();
        pool.absorb(&params(json!({
            "layer": "svc",
            "_extensions": ["jinja2_time.TimeExtension"],
            "_template": "/t/base",
            "project_slug": "myproj"
        })));

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get("project_slug"), Some(&json!("myproj")));
    }

    #[test]
    fn later_layers_overwrite() {
        let mut pool = SharedVariablePool::new();
        pool.absorb(&params(json!({"python": "3.11"})));
        pool.absorb(&params(json!({"python": "3.12"})));
        assert_eq!(pool.get("python"), Some(&json!("3.12")));
    }

    #[test]
    fn inject_only_declared_names() {
        let mut pool = SharedVariablePool::new();
        pool.absorb(&params(json!({"project_slug": "myproj", "license": "MIT"})));

        let mut ctx = params(json!({"project_slug": "default", "license": "BSD"}));
        let inherits: BTreeSet<String> = ["project_slug".to_string(), "absent".to_string()].into();
        let injected = pool.inject(&mut ctx, &inherits);

        assert_eq!(injected, ["project_slug"]);
        assert_eq!(ctx["project_slug"], json!("myproj"));
        assert_eq!(ctx["license"], json!("BSD"));
    }
}
