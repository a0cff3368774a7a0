//! Choice normalization
//!
//! Choice lists accept plain strings, structured options and separators. Every
//! entry is normalized into a [`ChoiceItem`] before a prompt sees it, so prompt
//! implementations only ever deal with the canonical form.

use crate::{
    answers::Answers,
    constants::SEPARATOR_LINE,
    error::{Error, Result},
    question::Dynamic,
};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Whether (and why) a choice cannot be picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Disabled {
    #[default]
    No,
    Yes,
    Reason(String),
}

impl Disabled {
    pub fn is_disabled(&self) -> bool {
        !matches!(self, Disabled::No)
    }

    /// Text shown next to a disabled choice.
    pub fn label(&self) -> Option<&str> {
        match self {
            Disabled::No => None,
            Disabled::Yes => Some("Disabled"),
            Disabled::Reason(reason) => Some(reason),
        }
    }
}

impl From<bool> for Disabled {
    fn from(disabled: bool) -> Self {
        if disabled {
            Disabled::Yes
        } else {
            Disabled::No
        }
    }
}

impl From<&str> for Disabled {
    fn from(reason: &str) -> Self {
        Disabled::Reason(reason.to_string())
    }
}

impl<'de> Deserialize<'de> for Disabled {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Reason(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(flag) => flag.into(),
            Raw::Reason(reason) => Disabled::Reason(reason),
        })
    }
}

/// A structured choice as written by the caller.
#[derive(Debug, Clone, Default)]
pub struct ChoiceOption {
    pub name: Option<String>,
    pub value: Option<Value>,
    pub short: Option<String>,
    pub key: Option<char>,
    pub checked: bool,
    pub disabled: Option<Dynamic<Disabled>>,
}

impl ChoiceOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    pub fn with_value(value: impl Into<Value>) -> Self {
        Self { value: Some(value.into()), ..Self::default() }
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    pub fn key(mut self, key: char) -> Self {
        self.key = Some(key);
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: impl Into<Disabled>) -> Self {
        self.disabled = Some(Dynamic::Literal(disabled.into()));
        self
    }

    pub fn disabled_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Answers) -> anyhow::Result<Disabled> + Send + Sync + 'static,
    {
        self.disabled = Some(Dynamic::derived(f));
        self
    }
}

/// Raw choice list entry, before normalization.
#[derive(Debug, Clone)]
pub enum ChoiceInput {
    Text(String),
    /// Separator with an optional custom line.
    Separator(Option<String>),
    Option(ChoiceOption),
}

impl ChoiceInput {
    pub fn separator() -> Self {
        ChoiceInput::Separator(None)
    }
}

impl From<&str> for ChoiceInput {
    fn from(text: &str) -> Self {
        ChoiceInput::Text(text.to_string())
    }
}

impl From<String> for ChoiceInput {
    fn from(text: String) -> Self {
        ChoiceInput::Text(text)
    }
}

impl From<ChoiceOption> for ChoiceInput {
    fn from(option: ChoiceOption) -> Self {
        ChoiceInput::Option(option)
    }
}

impl From<Separator> for ChoiceInput {
    fn from(separator: Separator) -> Self {
        ChoiceInput::Separator(Some(separator.line))
    }
}

/// Choice entry as it appears in JSON/YAML question files.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawChoice {
    Text(String),
    Object {
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        line: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        value: Option<Value>,
        #[serde(default)]
        short: Option<String>,
        #[serde(default)]
        key: Option<char>,
        #[serde(default)]
        checked: bool,
        #[serde(default)]
        disabled: Option<Disabled>,
    },
}

impl<'de> Deserialize<'de> for ChoiceInput {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawChoice::deserialize(deserializer)? {
            RawChoice::Text(text) => ChoiceInput::Text(text),
            RawChoice::Object { kind: Some(kind), line, .. } if kind == "separator" => {
                ChoiceInput::Separator(line)
            }
            RawChoice::Object { name, value, short, key, checked, disabled, .. } => {
                ChoiceInput::Option(ChoiceOption {
                    name,
                    value,
                    short,
                    key,
                    checked,
                    disabled: disabled.map(Dynamic::Literal),
                })
            }
        })
    }
}

/// Display-only entry of a choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator {
    pub line: String,
}

impl Separator {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// `false` for separators, `true` for genuine choices.
    pub fn exclude(item: &ChoiceItem) -> bool {
        !item.is_separator()
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::new(SEPARATOR_LINE)
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// A selectable entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub name: String,
    pub value: Value,
    /// Short form printed once the choice is picked.
    pub short: String,
    pub key: Option<char>,
    pub checked: bool,
    pub disabled: Disabled,
}

impl Choice {
    pub fn is_selectable(&self) -> bool {
        !self.disabled.is_disabled()
    }
}

/// Canonical choice list entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceItem {
    Separator(Separator),
    Choice(Choice),
}

impl ChoiceItem {
    /// Normalizes one raw entry. `answers` feeds derived `disabled` fields.
    /// Normalizes one entry of `question`'s choices.
    pub fn normalize(input: &ChoiceInput, question: &str, answers: &Answers) -> Result<Self> {
        match input {
            ChoiceInput::Text(text) => Ok(ChoiceItem::Choice(Choice {
                name: text.clone(),
                value: Value::String(text.clone()),
                short: text.clone(),
                key: None,
                checked: false,
                disabled: Disabled::No,
            })),
            ChoiceInput::Separator(line) => Ok(ChoiceItem::Separator(
                line.as_ref().map(Separator::new).unwrap_or_default(),
            )),
            ChoiceInput::Option(option) => {
                let (name, value) = match (&option.name, &option.value) {
                    (Some(name), Some(value)) => (name.clone(), value.clone()),
                    (Some(name), None) => (name.clone(), Value::String(name.clone())),
                    (None, Some(value)) => (display_value(value), value.clone()),
                    (None, None) => {
                        return Err(Error::MalformedChoice(
                            "a choice needs at least a `name` or a `value`".to_string(),
                        ))
                    }
                };
                let disabled = match &option.disabled {
                    Some(Dynamic::Derived(f)) => f(answers).map_err(|e| {
                        let e = e.context(format!("choice '{name}'"));
                        Error::derivation(question, "disabled", e)
                    })?,
                    Some(Dynamic::Literal(disabled)) => disabled.clone(),
                    None => Disabled::No,
                };
                Ok(ChoiceItem::Choice(Choice {
                    short: option.short.clone().unwrap_or_else(|| name.clone()),
                    name,
                    value,
                    key: option.key.map(|k| k.to_ascii_lowercase()),
                    checked: option.checked,
                    disabled,
                }))
            }
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, ChoiceItem::Separator(_))
    }

    pub fn as_choice(&self) -> Option<&Choice> {
        match self {
            ChoiceItem::Choice(choice) => Some(choice),
            ChoiceItem::Separator(_) => None,
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Normalized choice list handed to prompts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choices {
    items: Vec<ChoiceItem>,
}

impl Choices {
    pub fn new(items: Vec<ChoiceItem>) -> Self {
        Self { items }
    }

    pub fn normalize_all(
        inputs: &[ChoiceInput],
        question: &str,
        answers: &Answers,
    ) -> Result<Self> {
        inputs
            .iter()
            .map(|input| ChoiceItem::normalize(input, question, answers))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Number of entries, separators included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ChoiceItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Choice> {
        self.items.get(index).and_then(ChoiceItem::as_choice)
    }

    /// Real indices of entries a cursor may land on.
    pub fn selectable(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| Separator::exclude(item))
            .filter(|(_, item)| item.as_choice().is_some_and(Choice::is_selectable))
            .map(|(index, _)| index)
            .collect()
    }

    /// Real indices of all non-separator entries, disabled ones included.
    pub fn choice_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| Separator::exclude(item))
            .map(|(index, _)| index)
            .collect()
    }

    /// Real index of the `nth` non-separator entry.
    pub fn real_index_of(&self, nth: usize) -> Option<usize> {
        self.choice_indices().get(nth).copied()
    }

    /// Values of the choices at the given real indices, in list order.
    pub fn values_of(&self, indices: &[usize]) -> Vec<Value> {
        self.items
            .iter()
            .enumerate()
            .filter(|(index, _)| indices.contains(index))
            .filter_map(|(_, item)| item.as_choice().map(|c| c.value.clone()))
            .collect()
    }

    /// Real index of the first choice whose value equals `value`.
    pub fn position_of_value(&self, value: &Value) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.as_choice().is_some_and(|c| &c.value == value))
    }

    /// Resolves a question default (an index among choices or a value) to a
    /// real index of a selectable entry.
    pub fn default_index(&self, default: Option<&Value>) -> Option<usize> {
        let selectable = self.selectable();
        let index = match default? {
            Value::Number(n) => {
                let nth = usize::try_from(n.as_u64()?).ok()?;
                self.real_index_of(nth)?
            }
            value => self.position_of_value(value)?,
        };
        selectable.contains(&index).then_some(index)
    }
}
