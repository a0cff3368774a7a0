use crate::error::Result;
use serde_json::Value;

/// Template engine behind question files.
///
/// Contexts are JSON objects: the answers collected so far, plus `value`
/// when a filter or validation rule looks at the answer being checked.
pub trait TemplateRenderer: Send + Sync {
    /// Renders a template string.
    fn render(&self, template: &str, context: &Value) -> Result<String>;

    /// Evaluates an expression and returns its value as JSON.
    fn evaluate(&self, expr: &str, context: &Value) -> Result<Value>;

    /// Evaluates an expression for its truthiness. An empty expression is
    /// true.
    fn execute_expression(&self, expr: &str, context: &Value) -> Result<bool>;
}
