use super::{
    answered_line, error_line, hint, line::LineEditor, paginator::Paginator, question_line, Prompt,
    PromptContext,
};
use crate::{
    choice::{ChoiceItem, Choices},
    constants::validation::INVALID_INDEX,
    error::{Error, Result},
    ui::BaseUi,
};
use async_trait::async_trait;
use crossterm::style::Stylize;
use serde_json::Value;

/// Numbered choices picked by typing their number.
pub struct RawListPrompt {
    message: String,
    choices: Choices,
    /// Real index of the pre-selected choice.
    default: Option<usize>,
    paginator: Paginator,
    line: LineEditor,
    error: Option<String>,
}

impl RawListPrompt {
    pub fn create(ctx: PromptContext) -> Result<Box<dyn Prompt>> {
        if ctx.choices.selectable().is_empty() {
            return Err(Error::prompt_config(&ctx.name, "a list needs at least one selectable choice"));
        }
        Ok(Box::new(Self {
            message: ctx.message,
            default: ctx.choices.default_index(ctx.default.as_ref()),
            choices: ctx.choices,
            paginator: Paginator::new(ctx.page_size, ctx.paginated),
            line: LineEditor::default(),
            error: ctx.error,
        }))
    }

    /// Real index the typed number points at, or the default when nothing
    /// was typed.
    fn typed_index(&self) -> Option<usize> {
        if self.line.is_empty() {
            return self.default;
        }
        let number: usize = self.line.value().trim().parse().ok()?;
        self.choices.real_index_of(number.checked_sub(1)?)
    }

    fn frame(&self) -> String {
        let highlighted = self.typed_index();
        let mut number = 0;
        let lines: Vec<String> = self
            .choices
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                ChoiceItem::Separator(separator) => format!("   {}", hint(&separator.line)),
                ChoiceItem::Choice(choice) => {
                    number += 1;
                    let line = format!("  {number}) {}", choice.name);
                    if !choice.is_selectable() {
                        hint(&format!("{line} ({})", choice.disabled.label().unwrap_or_default()))
                    } else if Some(index) == highlighted {
                        line.cyan().to_string()
                    } else {
                        line
                    }
                }
            })
            .collect();

        let default_number = self.default.and_then(|real| {
            self.choices.choice_indices().iter().position(|i| *i == real).map(|n| n + 1)
        });
        let suffix = default_number.map(|n| hint(&format!("({n})"))).unwrap_or_default();

        format!(
            "{}\n{}\n  Answer: {}",
            question_line(&self.message, &suffix),
            self.paginator.paginate(&lines, highlighted.unwrap_or(0)),
            self.line.value()
        )
    }
}

#[async_trait]
impl Prompt for RawListPrompt {
    async fn run(&mut self, ui: &mut BaseUi) -> Result<Value> {
        loop {
            let bottom = self.error.as_deref().map(error_line);
            ui.render(&self.frame(), bottom.as_deref())?;

            let key = ui.next_keypress().await?;
            if !key.is("return") {
                self.line.handle(&key);
                continue;
            }
            let picked = self
                .typed_index()
                .and_then(|index| self.choices.get(index))
                .filter(|choice| choice.is_selectable());
            match picked {
                Some(choice) => {
                    let value = choice.value.clone();
                    ui.render(&answered_line(&self.message, &choice.short), None)?;
                    return Ok(value);
                }
                None => {
                    self.error = Some(INVALID_INDEX.to_string());
                    self.line.clear();
                }
            }
        }
    }
}
