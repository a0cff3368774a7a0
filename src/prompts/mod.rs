//! Prompt implementations and the contract they share
//!
//! A prompt is built by a [`PromptFactory`] from a fully resolved
//! [`PromptContext`] and asked exactly once through [`Prompt::run`]. The
//! session owns everything around it: resolving derived fields, filtering,
//! validating and re-asking.

use crate::{
    answers::Answers,
    choice::Choices,
    error::Result,
    ui::BaseUi,
};
use async_trait::async_trait;
use crossterm::style::Stylize;
use serde_json::Value;
use std::sync::Arc;

pub mod checkbox;
pub mod confirm;
pub mod editor;
pub mod expand;
pub mod input;
mod line;
pub mod list;
pub mod paginator;
pub mod password;
pub mod rawlist;

pub use checkbox::CheckboxPrompt;
pub use confirm::ConfirmPrompt;
pub use editor::EditorPrompt;
pub use expand::ExpandPrompt;
pub use input::InputPrompt;
pub use list::ListPrompt;
pub use password::PasswordPrompt;
pub use rawlist::RawListPrompt;

/// Everything a prompt needs to ask one question.
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub name: String,
    pub message: String,
    pub default: Option<Value>,
    pub choices: Choices,
    pub paginated: bool,
    pub page_size: usize,
    pub mask: Option<char>,
    /// Answers collected before this question.
    pub answers: Answers,
    /// Why the previous attempt was rejected, if it was.
    pub error: Option<String>,
}

/// One ask of one question.
#[async_trait]
pub trait Prompt: Send {
    /// Drives the UI until the user submits, and returns the raw answer.
    async fn run(&mut self, ui: &mut BaseUi) -> Result<Value>;
}

/// Builds a prompt for a resolved question. Returning
/// [`Error::PromptConfig`](crate::Error::PromptConfig) rejects the question.
pub type PromptFactory = Arc<dyn Fn(PromptContext) -> Result<Box<dyn Prompt>> + Send + Sync>;

/// `? message suffix`
pub(crate) fn question_line(message: &str, suffix: &str) -> String {
    let mut line = format!("{} {}", "?".green(), message.bold());
    if !suffix.is_empty() {
        line.push(' ');
        line.push_str(suffix);
    }
    line
}

/// The frame left on screen once a question is answered.
pub(crate) fn answered_line(message: &str, answer: &str) -> String {
    question_line(message, &answer.cyan().to_string())
}

pub(crate) fn error_line(error: &str) -> String {
    format!("{} {}", ">>".red(), error)
}

pub(crate) fn hint(text: &str) -> String {
    text.dark_grey().to_string()
}

/// String form of a default value, as pre-filled or shown in hints.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
