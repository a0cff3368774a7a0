use super::{answered_line, error_line, hint, line::LineEditor, question_line, Prompt, PromptContext};
use crate::{error::Result, ui::BaseUi};
use async_trait::async_trait;
use serde_json::Value;

/// Yes/no question.
pub struct ConfirmPrompt {
    message: String,
    default: bool,
    error: Option<String>,
    line: LineEditor,
}

impl ConfirmPrompt {
    pub fn create(ctx: PromptContext) -> Result<Box<dyn Prompt>> {
        Ok(Box::new(Self {
            message: ctx.message,
            // anything but an explicit `false` defaults to yes
            default: ctx.default != Some(Value::Bool(false)),
            error: ctx.error,
            line: LineEditor::default(),
        }))
    }

    fn frame(&self) -> String {
        let options = if self.default { "(Y/n)" } else { "(y/N)" };
        let mut suffix = hint(options);
        if !self.line.is_empty() {
            suffix.push(' ');
            suffix.push_str(self.line.value());
        }
        question_line(&self.message, &suffix)
    }

    fn answer(&self) -> bool {
        let input = self.line.value().trim();
        if input.is_empty() {
            self.default
        } else {
            input.starts_with(|c: char| c.eq_ignore_ascii_case(&'y'))
        }
    }
}

#[async_trait]
impl Prompt for ConfirmPrompt {
    async fn run(&mut self, ui: &mut BaseUi) -> Result<Value> {
        loop {
            let bottom = self.error.as_deref().map(error_line);
            ui.render(&self.frame(), bottom.as_deref())?;

            let key = ui.next_keypress().await?;
            if key.is("return") {
                let answer = self.answer();
                let shown = if answer { "Yes" } else { "No" };
                ui.render(&answered_line(&self.message, shown), None)?;
                return Ok(Value::Bool(answer));
            }
            self.line.handle(&key);
        }
    }
}
