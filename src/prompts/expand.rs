use super::{
    answered_line, error_line, hint, line::LineEditor, paginator::Paginator, question_line, Prompt,
    PromptContext,
};
use crate::{
    choice::{Choice, ChoiceItem, Choices},
    constants::validation::INVALID_KEY,
    error::{Error, Result},
    ui::BaseUi,
};
use async_trait::async_trait;
use crossterm::style::Stylize;
use serde_json::Value;
use std::collections::HashSet;

const HELP_KEY: char = 'h';
const HELP_LABEL: &str = "Help, list all options";

/// Choices picked by a one-letter key, expandable to the full list.
pub struct ExpandPrompt {
    message: String,
    choices: Choices,
    /// Real index of the pre-selected choice.
    default: Option<usize>,
    expanded: bool,
    paginator: Paginator,
    line: LineEditor,
    error: Option<String>,
}

impl ExpandPrompt {
    pub fn create(ctx: PromptContext) -> Result<Box<dyn Prompt>> {
        validate_keys(&ctx.name, &ctx.choices)?;
        if ctx.choices.selectable().is_empty() {
            return Err(Error::prompt_config(&ctx.name, "an expand list needs at least one selectable choice"));
        }
        Ok(Box::new(Self {
            message: ctx.message,
            default: ctx.choices.default_index(ctx.default.as_ref()),
            choices: ctx.choices,
            expanded: false,
            paginator: Paginator::new(ctx.page_size, ctx.paginated),
            line: LineEditor::default(),
            error: ctx.error,
        }))
    }

    fn keyed(&self) -> impl Iterator<Item = (usize, &Choice, char)> + '_ {
        self.choices
            .items()
            .iter()
            .enumerate()
            .filter_map(|(index, item)| item.as_choice().map(|choice| (index, choice)))
            .filter_map(|(index, choice)| choice.key.map(|key| (index, choice, key)))
    }

    /// `(abcH)`: every key, the default one upper-cased. Help is the
    /// default when nothing else is.
    fn key_hint(&self) -> String {
        let mut keys: String = self
            .keyed()
            .map(|(index, _, key)| {
                if Some(index) == self.default {
                    key.to_ascii_uppercase()
                } else {
                    key
                }
            })
            .collect();
        keys.push(if self.default.is_some() { HELP_KEY } else { HELP_KEY.to_ascii_uppercase() });
        format!("({keys})")
    }

    fn typed_choice(&self) -> Option<(usize, &Choice)> {
        let mut chars = self.line.value().trim().chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_lowercase(),
            _ => return None,
        };
        self.keyed().find(|(_, _, k)| *k == key).map(|(index, choice, _)| (index, choice))
    }

    fn frame(&self) -> String {
        let mut suffix = hint(&self.key_hint());
        if !self.line.is_empty() {
            suffix.push(' ');
            suffix.push_str(self.line.value());
        }
        let question = question_line(&self.message, &suffix);
        if !self.expanded {
            return question;
        }

        let highlighted = self.typed_choice().map(|(index, _)| index);
        let mut lines: Vec<String> = self
            .choices
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                ChoiceItem::Separator(separator) => format!("   {}", hint(&separator.line)),
                ChoiceItem::Choice(choice) => {
                    let key = choice.key.unwrap_or(' ');
                    let line = format!("  {key}) {}", choice.name);
                    match choice.disabled.label() {
                        Some(label) => hint(&format!("{line} ({label})")),
                        None if Some(index) == highlighted => line.cyan().to_string(),
                        None => line,
                    }
                }
            })
            .collect();
        lines.push(format!("  {HELP_KEY}) {HELP_LABEL}"));
        format!(
            "{question}\n{}\n  Answer: {}",
            self.paginator.paginate(&lines, highlighted.unwrap_or(0)),
            self.line.value()
        )
    }

    /// Collapsed mode previews the choice a typed key points at.
    fn preview(&self) -> Option<String> {
        if self.expanded {
            return None;
        }
        self.typed_choice().map(|(_, choice)| format!("{} {}", ">>".cyan(), choice.name))
    }
}

/// Every choice needs its own key, and the help key is taken.
fn validate_keys(question: &str, choices: &Choices) -> Result<()> {
    let mut seen = HashSet::new();
    for choice in choices.items().iter().filter_map(ChoiceItem::as_choice) {
        let Some(key) = choice.key else {
            return Err(Error::prompt_config(
                question,
                format!("choice '{}' has no key", choice.name),
            ));
        };
        if key == HELP_KEY {
            return Err(Error::prompt_config(
                question,
                format!("key '{HELP_KEY}' is reserved for help"),
            ));
        }
        if !seen.insert(key) {
            return Err(Error::prompt_config(question, format!("duplicate key '{key}'")));
        }
    }
    Ok(())
}

#[async_trait]
impl Prompt for ExpandPrompt {
    async fn run(&mut self, ui: &mut BaseUi) -> Result<Value> {
        loop {
            let bottom = match &self.error {
                Some(error) => Some(error_line(error)),
                None => self.preview(),
            };
            ui.render(&self.frame(), bottom.as_deref())?;

            let key = ui.next_keypress().await?;
            if !key.is("return") {
                if self.line.handle(&key) {
                    self.error = None;
                }
                continue;
            }

            let typed = self.line.value().trim().to_ascii_lowercase();
            let picked = if typed.is_empty() {
                self.default
            } else {
                self.typed_choice().map(|(index, _)| index)
            };
            match picked.and_then(|index| self.choices.get(index)) {
                Some(choice) if choice.is_selectable() => {
                    let value = choice.value.clone();
                    ui.render(&answered_line(&self.message, &choice.short), None)?;
                    return Ok(value);
                }
                _ if typed.is_empty() || typed == HELP_KEY.to_string() => {
                    self.expanded = true;
                    self.error = None;
                }
                _ => self.error = Some(INVALID_KEY.to_string()),
            }
            self.line.clear();
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

    fn conflict_actions() -> Choices {
        choices(vec![
            ChoiceOption::new("Overwrite").key('y').value("overwrite").into(),
            ChoiceOption::new("Overwrite all").key('A').value("all").into(),
            ChoiceInput::separator(),
            ChoiceOption::new("Abort").key('x').value("abort").into(),
        ])
    }

    async fn run_with(ctx: PromptContext, typed: &[&str]) -> (Value, String) {
        let (console, terminal) = Console::virtual_terminal(80);
        for text in typed {
            terminal.submit(text);
        }
        let mut ui = BaseUi::new(&console).unwrap();
        let answer = ExpandPrompt::create(ctx).unwrap().run(&mut ui).await.unwrap();
        (answer, strip_ansi(&terminal.output()))
    }

    #[tokio::test]
    async fn key_picks_choice() {
        let ctx = PromptContext { choices: conflict_actions(), ..context("Conflict?") };
        let (answer, out) = run_with(ctx, &["a"]).await;
        assert_eq!(answer, json!("all"));
        assert!(out.contains("? Conflict? (yaxH)"));
        assert!(out.contains(">> Overwrite all"));
        assert!(out.ends_with("? Conflict? Overwrite all"));
    }

    #[tokio::test]
    async fn default_key_is_upper_case_and_taken_on_enter() {
        let ctx = PromptContext {
            choices: conflict_actions(),
            default: Some(json!("abort")),
            ..context("Conflict?")
        };
        let (answer, out) = run_with(ctx, &[""]).await;
        assert_eq!(answer, json!("abort"));
        assert!(out.contains("(yaXh)"));
    }

    #[tokio::test]
    async fn help_expands_the_list() {
        let ctx = PromptContext { choices: conflict_actions(), ..context("Conflict?") };
        let (answer, out) = run_with(ctx, &["h", "y"]).await;
        assert_eq!(answer, json!("overwrite"));
        assert!(out.contains("  y) Overwrite"));
        assert!(out.contains("  h) Help, list all options"));
        assert!(out.contains("  Answer: "));
    }

    #[tokio::test]
    async fn unknown_key_is_rejected() {
        let ctx = PromptContext { choices: conflict_actions(), ..context("Conflict?") };
        let (answer, out) = run_with(ctx, &["z", "x"]).await;
        assert_eq!(answer, json!("abort"));
        assert!(out.contains(">> Please enter a valid command"));
    }

    #[test]
    fn misconfigured_keys_are_rejected() {
        let missing = choices(vec![ChoiceOption::new("a").key('a').into(), "b".into()]);
        let duplicate = choices(vec![
            ChoiceOption::new("a").key('a').into(),
            ChoiceOption::new("b").key('A').into(),
        ]);
        let reserved = choices(vec![ChoiceOption::new("help me").key('h').into()]);
        for choices in [missing, duplicate, reserved] {
            let ctx = PromptContext { choices, ..context("Pick") };
            assert!(matches!(ExpandPrompt::create(ctx), Err(Error::PromptConfig { .. })));
        }
    }
}
