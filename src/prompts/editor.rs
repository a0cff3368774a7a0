use super::{
    answered_line, error_line, hint, question_line, value_to_string, Prompt, PromptContext,
};
use crate::{
    error::{Error, Result},
    ui::BaseUi,
};
use async_trait::async_trait;
use dialoguer::Editor;
use serde_json::Value;

/// Long text written in the user's `$VISUAL`/`$EDITOR`.
pub struct EditorPrompt {
    message: String,
    default: String,
    error: Option<String>,
}

impl EditorPrompt {
    pub fn create(ctx: PromptContext) -> Result<Box<dyn Prompt>> {
        Ok(Box::new(Self {
            message: ctx.message,
            default: ctx.default.as_ref().map(value_to_string).unwrap_or_default(),
            error: ctx.error,
        }))
    }

    fn frame(&self) -> String {
        question_line(&self.message, &hint("Press <enter> to launch your preferred editor."))
    }
}

#[async_trait]
impl Prompt for EditorPrompt {
    async fn run(&mut self, ui: &mut BaseUi) -> Result<Value> {
        loop {
            let bottom = self.error.as_deref().map(error_line);
            ui.render(&self.frame(), bottom.as_deref())?;
            if ui.next_keypress().await?.is("return") {
                break;
            }
        }

        let initial = self.default.clone();
        log::debug!("Launching external editor");
        let edited = ui
            .release_terminal(move || Editor::new().edit(&initial))
            .await?
            .map_err(|e| Error::EditorError(e.to_string()))?;

        // closing the editor without saving keeps the default text
        let text = edited.unwrap_or_else(|| self.default.clone());
        ui.render(&answered_line(&self.message, &hint("Received")), None)?;
        Ok(Value::String(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{prompts::testing::context, ui::{text::strip_ansi, Console}};

    #[test]
    fn frame_invites_to_launch() {
        let prompt = EditorPrompt { message: "Bio:".into(), default: String::new(), error: None };
        assert_eq!(
            strip_ansi(&prompt.frame()),
            "? Bio: Press <enter> to launch your preferred editor."
        );
    }

    #[tokio::test]
    async fn waits_for_enter_before_launching() {
        let (console, mut terminal) = Console::virtual_terminal(80);
        terminal.press_named("up");
        terminal.hang_up();
        let mut ui = BaseUi::new(&console).unwrap();
        let mut prompt = EditorPrompt::create(context("Bio:")).unwrap();
        assert!(matches!(prompt.run(&mut ui).await, Err(Error::InputClosed)));
        assert!(strip_ansi(&terminal.output())
            .contains("? Bio: Press <enter> to launch your preferred editor."));
    }
}
