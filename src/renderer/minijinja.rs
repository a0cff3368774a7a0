use super::filters::*;
use crate::{error::Result, renderer::interface::TemplateRenderer};
use minijinja::Environment;
use serde_json::{json, Value};

/// MiniJinja-based template engine with the case conversion filters.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
    /// Merged under every context; keys in the context win.
    default_context: Value,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_filter("camel_case", to_camel_case);
        env.add_filter("kebab_case", to_kebab_case);
        env.add_filter("pascal_case", to_pascal_case);
        env.add_filter("screaming_snake_case", to_screaming_snake_case);
        env.add_filter("snake_case", to_snake_case);
        env.add_filter("train_case", to_train_case);
        env.add_filter("plural", to_plural);
        env.add_filter("singular", to_singular);
        env.add_filter("regex", regex_filter);
        env.add_filter("join_names", join_names);

        let default_context = json!({
            "platform": {
                "os": std::env::consts::OS,
                "arch": std::env::consts::ARCH,
            }
        });
        Self { env, default_context }
    }

    fn merged(&self, context: &Value) -> Value {
        match (self.default_context.as_object(), context.as_object()) {
            (Some(defaults), Some(values)) => {
                let mut merged = defaults.clone();
                merged.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
                Value::Object(merged)
            }
            _ => context.clone(),
        }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        Ok(self.env.render_str(template, self.merged(context))?)
    }

    fn evaluate(&self, expr: &str, context: &Value) -> Result<Value> {
        let expr = self.env.compile_expression(expr)?;
        let value = expr.eval(self.merged(context))?;
        Ok(serde_json::to_value(&value)?)
    }

    fn execute_expression(&self, expr: &str, context: &Value) -> Result<bool> {
        if expr.trim().is_empty() {
            return Ok(true);
        }
        let expr = self.env.compile_expression(expr)?;
        Ok(expr.eval(self.merged(context))?.is_true())
    }
}
