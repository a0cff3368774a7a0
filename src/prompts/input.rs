use super::{
    answered_line, error_line, hint, line::LineEditor, question_line, value_to_string, Prompt,
    PromptContext,
};
use crate::{error::Result, ui::BaseUi};
use async_trait::async_trait;
use serde_json::Value;

/// Free text on one line.
pub struct InputPrompt {
    message: String,
    default: Option<Value>,
    error: Option<String>,
    line: LineEditor,
}

impl InputPrompt {
    pub fn create(ctx: PromptContext) -> Result<Box<dyn Prompt>> {
        Ok(Box::new(Self {
            message: ctx.message,
            default: ctx.default.filter(|d| !d.is_null()),
            error: ctx.error,
            line: LineEditor::default(),
        }))
    }

    fn frame(&self) -> String {
        let mut suffix = match &self.default {
            Some(default) => hint(&format!("({})", value_to_string(default))),
            None => String::new(),
        };
        if !self.line.is_empty() {
            if !suffix.is_empty() {
                suffix.push(' ');
            }
            suffix.push_str(self.line.value());
        }
        question_line(&self.message, &suffix)
    }

    fn answer(&self) -> Value {
        match &self.default {
            Some(default) if self.line.is_empty() => default.clone(),
            _ => Value::String(self.line.value().to_string()),
        }
    }
}

#[async_trait]
impl Prompt for InputPrompt {
    async fn run(&mut self, ui: &mut BaseUi) -> Result<Value> {
        loop {
            let bottom = self.error.as_deref().map(error_line);
            ui.render(&self.frame(), bottom.as_deref())?;

            let key = ui.next_keypress().await?;
            if key.is("return") {
                let answer = self.answer();
                ui.render(&answered_line(&self.message, &value_to_string(&answer)), None)?;
                return Ok(answer);
            }
            self.line.handle(&key);
        }
    }
}
