use super::{answered_line, error_line, line::LineEditor, question_line, Prompt, PromptContext};
use crate::{constants::DEFAULT_MASK, error::Result, ui::BaseUi};
use async_trait::async_trait;
use serde_json::Value;

/// Text input echoed as mask characters. The default is taken on an empty
/// line but never shown.
pub struct PasswordPrompt {
    message: String,
    mask: char,
    default: Option<Value>,
    error: Option<String>,
    line: LineEditor,
}

impl PasswordPrompt {
    pub fn create(ctx: PromptContext) -> Result<Box<dyn Prompt>> {
        Ok(Box::new(Self {
            message: ctx.message,
            mask: ctx.mask.unwrap_or(DEFAULT_MASK),
            default: ctx.default.filter(|value| !value.is_null()),
            error: ctx.error,
            line: LineEditor::default(),
        }))
    }

    fn masked(&self) -> String {
        std::iter::repeat(self.mask).take(self.line.value().chars().count()).collect()
    }
}

#[async_trait]
impl Prompt for PasswordPrompt {
    async fn run(&mut self, ui: &mut BaseUi) -> Result<Value> {
        loop {
            let bottom = self.error.as_deref().map(error_line);
            ui.render(&question_line(&self.message, &self.masked()), bottom.as_deref())?;

            let key = ui.next_keypress().await?;
            if key.is("return") {
                ui.render(&answered_line(&self.message, &self.masked()), None)?;
                if self.line.is_empty() {
                    let default = self.default.clone();
                    return Ok(default.unwrap_or_else(|| Value::String(String::new())));
                }
                return Ok(Value::String(self.line.value().to_string()));
            }
            self.line.handle(&key);
        }
    }
}
