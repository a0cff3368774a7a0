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
use std::collections::BTreeSet;

const POINTER: &str = "❯";
const CHECKED: &str = "◉";
const UNCHECKED: &str = "◯";
const HELP: &str = "(Press <space> to select, <a> to toggle all, <i> to invert selection)";

/// Pick any number of choices.
pub struct CheckboxPrompt {
    message: String,
    choices: Choices,
    selectable: Vec<usize>,
    cursor: usize,
    /// Real indices of checked entries.
    checked: BTreeSet<usize>,
    paginator: Paginator,
    error: Option<String>,
}

impl CheckboxPrompt {
    pub fn create(ctx: PromptContext) -> Result<Box<dyn Prompt>> {
        let selectable = ctx.choices.selectable();
        if selectable.is_empty() {
            return Err(Error::prompt_config(&ctx.name, "a checkbox needs at least one selectable choice"));
        }
        let checked = initially_checked(&ctx.choices, ctx.default.as_ref());
        Ok(Box::new(Self {
            message: ctx.message,
            choices: ctx.choices,
            selectable,
            cursor: 0,
            checked,
            paginator: Paginator::new(ctx.page_size, ctx.paginated),
            error: ctx.error,
        }))
    }

    fn active(&self) -> usize {
        self.selectable[self.cursor]
    }

    fn toggle(&mut self, index: usize) {
        if !self.checked.remove(&index) {
            self.checked.insert(index);
        }
    }

    fn toggle_all(&mut self) {
        let all_checked = self.selectable.iter().all(|i| self.checked.contains(i));
        for index in self.selectable.clone() {
            if all_checked {
                self.checked.remove(&index);
            } else {
                self.checked.insert(index);
            }
        }
    }

    fn invert(&mut self) {
        for index in self.selectable.clone() {
            self.toggle(index);
        }
    }

    fn frame(&self) -> String {
        let active = self.active();
        let lines: Vec<String> = self
            .choices
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                ChoiceItem::Separator(separator) => format!(" {}", hint(&separator.line)),
                ChoiceItem::Choice(choice) => {
                    if let Some(label) = choice.disabled.label() {
                        return hint(&format!(" - {} ({label})", choice.name));
                    }
                    let mark = if self.checked.contains(&index) {
                        CHECKED.green().to_string()
                    } else {
                        UNCHECKED.to_string()
                    };
                    if index == active {
                        format!("{}{} {}", POINTER.cyan(), mark, choice.name.as_str().cyan())
                    } else {
                        format!(" {} {}", mark, choice.name)
                    }
                }
            })
            .collect();
        format!(
            "{}\n{}",
            question_line(&self.message, &hint(HELP)),
            self.paginator.paginate(&lines, active)
        )
    }

    fn answer(&self) -> (Value, String) {
        let indices: Vec<usize> = self.checked.iter().copied().collect();
        let shown = indices
            .iter()
            .filter_map(|i| self.choices.get(*i))
            .map(|choice| choice.short.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        (Value::Array(self.choices.values_of(&indices)), shown)
    }
}

/// Checked entries from a default array of values, else from `checked`.
fn initially_checked(choices: &Choices, default: Option<&Value>) -> BTreeSet<usize> {
    match default {
        Some(Value::Array(values)) => {
            values.iter().filter_map(|value| choices.position_of_value(value)).collect()
        }
        _ => choices
            .choice_indices()
            .into_iter()
            .filter(|i| choices.get(*i).is_some_and(|choice| choice.checked))
            .collect(),
    }
}

#[async_trait]
impl Prompt for CheckboxPrompt {
    async fn run(&mut self, ui: &mut BaseUi) -> Result<Value> {
        loop {
            let bottom = self.error.as_deref().map(error_line);
            ui.render(&self.frame(), bottom.as_deref())?;

            let key = ui.next_keypress().await?;
            let len = self.selectable.len();
            match key.name() {
                Some("up" | "k") => self.cursor = (self.cursor + len - 1) % len,
                Some("down" | "j") => self.cursor = (self.cursor + 1) % len,
                Some("space") => self.toggle(self.active()),
                Some("a") => self.toggle_all(),
                Some("i") => self.invert(),
                Some("return") => {
                    let (value, shown) = self.answer();
                    ui.render(&answered_line(&self.message, &shown), None)?;
                    return Ok(value);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        choice::{ChoiceInput, ChoiceOption},
        prompts::testing::{choices, context},
        ui::{text::strip_ansi, Console},
    };
    use serde_json::json;

    fn extras() -> Choices {
        choices(vec![
            "Bacon".into(),
            ChoiceOption::new("Egg").checked(true).into(),
            ChoiceInput::separator(),
            ChoiceOption::new("Truffle").disabled("too pricey").into(),
            ChoiceOption::new("Onion").value("onion").into(),
        ])
    }

    async fn run_with(ctx: PromptContext, keys: &[&str]) -> (Value, String) {
        let (console, terminal) = Console::virtual_terminal(80);
        for key in keys {
            match *key {
                "a" | "i" => terminal.type_text(key),
                named => terminal.press_named(named),
            };
        }
        let mut ui = BaseUi::new(&console).unwrap();
        let answer = CheckboxPrompt::create(ctx).unwrap().run(&mut ui).await.unwrap();
        (answer, strip_ansi(&terminal.output()))
    }

    #[tokio::test]
    async fn space_toggles_and_enter_returns_values() {
        let ctx = PromptContext { choices: extras(), ..context("Extras?") };
        let (answer, out) = run_with(ctx, &["space", "down", "down", "space", "return"]).await;
        assert_eq!(answer, json!(["Bacon", "Egg", "onion"]));
        assert!(out.ends_with("? Extras? Bacon, Egg, Onion"));
    }

    #[tokio::test]
    async fn checked_option_preselects() {
        let ctx = PromptContext { choices: extras(), ..context("Extras?") };
        let (answer, out) = run_with(ctx, &["return"]).await;
        assert_eq!(answer, json!(["Egg"]));
        assert!(out.contains("◉ Egg"));
        assert!(out.contains("- Truffle (too pricey)"));
    }

    #[tokio::test]
    async fn default_array_overrides_checked() {
        let ctx = PromptContext {
            choices: extras(),
            default: Some(json!(["onion"])),
            ..context("Extras?")
        };
        let (answer, _) = run_with(ctx, &["return"]).await;
        assert_eq!(answer, json!(["onion"]));
    }

    #[tokio::test]
    async fn toggle_all_and_invert() {
        let ctx = PromptContext { choices: extras(), ..context("Extras?") };
        let (answer, _) = run_with(ctx, &["a", "return"]).await;
        assert_eq!(answer, json!(["Bacon", "Egg", "onion"]));

        let ctx = PromptContext { choices: extras(), ..context("Extras?") };
        let (answer, _) = run_with(ctx, &["a", "a", "return"]).await;
        assert_eq!(answer, json!([]));

        let ctx = PromptContext { choices: extras(), ..context("Extras?") };
        let (answer, _) = run_with(ctx, &["i", "return"]).await;
        assert_eq!(answer, json!(["Bacon", "onion"]));
    }

    #[tokio::test]
    async fn disabled_entries_are_skipped_by_the_cursor() {
        let ctx = PromptContext { choices: extras(), ..context("Extras?") };
        // Bacon -> Egg -> Onion: Truffle is never under the cursor
        let (answer, _) = run_with(ctx, &["up", "space", "return"]).await;
        assert_eq!(answer, json!(["Egg", "onion"]));
    }
}
