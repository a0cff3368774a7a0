use super::{
    answered_line, error_line, hint, paginator::Paginator, question_line, Prompt, PromptContext,
};
use crate::{
    choice::{ChoiceItem, Choices},
    error::{Error, Result},
    ui::BaseUi,
};
use async_trait::async_trait;
use crossterm::style::Stylize;
use serde_json::Value;

const POINTER: &str = "❯";

/// Pick one choice with the arrow keys.
pub struct ListPrompt {
    message: String,
    choices: Choices,
    /// Real indices the cursor can land on.
    selectable: Vec<usize>,
    /// Position in `selectable`.
    cursor: usize,
    paginator: Paginator,
    error: Option<String>,
}

impl ListPrompt {
    pub fn create(ctx: PromptContext) -> Result<Box<dyn Prompt>> {
        let selectable = ctx.choices.selectable();
        if selectable.is_empty() {
            return Err(Error::prompt_config(&ctx.name, "a list needs at least one selectable choice"));
        }
        let cursor = ctx
            .choices
            .default_index(ctx.default.as_ref())
            .and_then(|index| selectable.iter().position(|i| *i == index))
            .unwrap_or(0);
        Ok(Box::new(Self {
            message: ctx.message,
            choices: ctx.choices,
            selectable,
            cursor,
            paginator: Paginator::new(ctx.page_size, ctx.paginated),
            error: ctx.error,
        }))
    }

    fn active(&self) -> usize {
        self.selectable[self.cursor]
    }

    fn frame(&self) -> String {
        let active = self.active();
        let lines: Vec<String> = self
            .choices
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                ChoiceItem::Separator(separator) => format!("  {}", hint(&separator.line)),
                ChoiceItem::Choice(choice) if index == active => {
                    format!("{} {}", POINTER, choice.name).cyan().to_string()
                }
                ChoiceItem::Choice(choice) => match choice.disabled.label() {
                    Some(label) => hint(&format!("  - {} ({label})", choice.name)),
                    None => format!("  {}", choice.name),
                },
            })
            .collect();
        format!(
            "{}\n{}",
            question_line(&self.message, &hint("(Use arrow keys)")),
            self.paginator.paginate(&lines, active)
        )
    }

    fn move_by(&mut self, forward: bool) {
        let len = self.selectable.len();
        self.cursor = if forward { (self.cursor + 1) % len } else { (self.cursor + len - 1) % len };
    }
}

#[async_trait]
impl Prompt for ListPrompt {
    async fn run(&mut self, ui: &mut BaseUi) -> Result<Value> {
        loop {
            let bottom = self.error.as_deref().map(error_line);
            ui.render(&self.frame(), bottom.as_deref())?;

            let key = ui.next_keypress().await?;
            match key.name() {
                Some("up" | "k") => self.move_by(false),
                Some("down" | "j") => self.move_by(true),
                Some("return") => {
                    let Some(choice) = self.choices.get(self.active()) else {
                        continue;
                    };
                    let value = choice.value.clone();
                    ui.render(&answered_line(&self.message, &choice.short), None)?;
                    return Ok(value);
                }
                _ => {}
            }
        }
    }
}
