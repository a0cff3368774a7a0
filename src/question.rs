//! Question definitions and their literal-or-derived fields

use crate::{answers::Answers, choice::ChoiceInput, error::Result, Error};
use serde_json::Value;
use std::{fmt, sync::Arc};

type DeriveFn<T> = dyn Fn(&Answers) -> anyhow::Result<T> + Send + Sync;

/// A question field that is either fixed or computed from earlier answers.
pub enum Dynamic<T> {
    Literal(T),
    Derived(Arc<DeriveFn<T>>),
}

impl<T: Clone> Dynamic<T> {
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&Answers) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Dynamic::Derived(Arc::new(f))
    }

    /// Resolves the field against the answers produced so far.
    pub fn resolve(
        &self,
        answers: &Answers,
        question: &str,
        field: &'static str,
    ) -> Result<T> {
        match self {
            Dynamic::Literal(value) => Ok(value.clone()),
            Dynamic::Derived(f) => {
                f(answers).map_err(|e| Error::derivation(question, field, e))
            }
        }
    }
}

impl<T> Clone for Dynamic<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Dynamic::Literal(value) => Dynamic::Literal(value.clone()),
            Dynamic::Derived(f) => Dynamic::Derived(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Dynamic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Dynamic::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl<T> From<T> for Dynamic<T> {
    fn from(value: T) -> Self {
        Dynamic::Literal(value)
    }
}

/// Outcome of a `validate` callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// Rejected; the generic invalid-input message is shown.
    Invalid,
    /// Rejected with a specific message.
    Message(String),
}

impl From<bool> for Validation {
    fn from(valid: bool) -> Self {
        if valid {
            Validation::Valid
        } else {
            Validation::Invalid
        }
    }
}

impl From<String> for Validation {
    fn from(message: String) -> Self {
        Validation::Message(message)
    }
}

impl From<&str> for Validation {
    fn from(message: &str) -> Self {
        Validation::Message(message.to_string())
    }
}

impl From<std::result::Result<(), String>> for Validation {
    fn from(result: std::result::Result<(), String>) -> Self {
        match result {
            Ok(()) => Validation::Valid,
            Err(message) => Validation::Message(message),
        }
    }
}

pub type Validator =
    Arc<dyn Fn(&Value, &Answers) -> anyhow::Result<Validation> + Send + Sync>;
pub type Filter = Arc<dyn Fn(Value, &Answers) -> anyhow::Result<Value> + Send + Sync>;

/// One question of a session.
#[derive(Clone)]
pub struct Question {
    /// Registered prompt type; `None` means plain text input.
    pub kind: Option<String>,
    /// Key under which the answer is stored.
    pub name: String,
    pub message: Option<Dynamic<String>>,
    pub default: Option<Dynamic<Value>>,
    pub choices: Option<Dynamic<Vec<ChoiceInput>>>,
    pub validate: Option<Validator>,
    pub filter: Option<Filter>,
    pub when: Dynamic<bool>,
    pub paginated: bool,
    pub page_size: Option<usize>,
    /// Echo character for masked input.
    pub mask: Option<char>,
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("message", &self.message)
            .field("default", &self.default)
            .field("choices", &self.choices)
            .field("validate", &self.validate.is_some())
            .field("filter", &self.filter.is_some())
            .field("when", &self.when)
            .field("paginated", &self.paginated)
            .finish_non_exhaustive()
    }
}

impl Question {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self { kind: Some(kind.into()), ..Self::untyped(name) }
    }

    /// A question without an explicit type; it is asked as `input`.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            kind: None,
            name: name.into(),
            message: None,
            default: None,
            choices: None,
            validate: None,
            filter: None,
            when: Dynamic::Literal(true),
            paginated: true,
            page_size: None,
            mask: None,
        }
    }

    pub fn input(name: impl Into<String>) -> Self {
        Self::new("input", name)
    }

    pub fn password(name: impl Into<String>) -> Self {
        Self::new("password", name)
    }

    pub fn confirm(name: impl Into<String>) -> Self {
        Self::new("confirm", name)
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new("list", name)
    }

    pub fn rawlist(name: impl Into<String>) -> Self {
        Self::new("rawlist", name)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new("checkbox", name)
    }

    pub fn expand(name: impl Into<String>) -> Self {
        Self::new("expand", name)
    }

    pub fn editor(name: impl Into<String>) -> Self {
        Self::new("editor", name)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(Dynamic::Literal(message.into()));
        self
    }

    pub fn message_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Answers) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.message = Some(Dynamic::derived(f));
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(Dynamic::Literal(value.into()));
        self
    }

    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Answers) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.default = Some(Dynamic::derived(f));
        self
    }

    pub fn choices<I, C>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ChoiceInput>,
    {
        self.choices =
            Some(Dynamic::Literal(choices.into_iter().map(Into::into).collect()));
        self
    }

    pub fn choices_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Answers) -> anyhow::Result<Vec<ChoiceInput>> + Send + Sync + 'static,
    {
        self.choices = Some(Dynamic::derived(f));
        self
    }

    pub fn when(mut self, ask: bool) -> Self {
        self.when = Dynamic::Literal(ask);
        self
    }

    pub fn when_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Answers) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.when = Dynamic::derived(f);
        self
    }

    /// Validates the raw (pre-filter) input.
    pub fn validate<F, V>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Answers) -> V + Send + Sync + 'static,
        V: Into<Validation>,
    {
        self.validate = Some(Arc::new(move |value, answers| Ok(f(value, answers).into())));
        self
    }

    /// Like [`Question::validate`], for validators that can themselves fail.
    pub fn try_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Answers) -> anyhow::Result<Validation> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(f));
        self
    }

    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: Fn(Value, &Answers) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(f));
        self
    }

    pub fn paginated(mut self, paginated: bool) -> Self {
        self.paginated = paginated;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn mask(mut self, mask: char) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Registered prompt type this question dispatches to.
    pub fn effective_kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(crate::constants::DEFAULT_PROMPT_TYPE)
    }

    pub(crate) fn resolve_message(&self, answers: &Answers) -> Result<String> {
        match &self.message {
            Some(message) => message.resolve(answers, &self.name, "message"),
            None => Ok(format!("{}:", self.name)),
        }
    }

    pub(crate) fn resolve_default(&self, answers: &Answers) -> Result<Option<Value>> {
        self.default
            .as_ref()
            .map(|default| default.resolve(answers, &self.name, "default"))
            .transpose()
    }
}

/// One or many questions, accepted by every `prompt` entry point.
#[derive(Debug, Clone, Default)]
pub struct Questions(pub Vec<Question>);

impl From<Question> for Questions {
    fn from(question: Question) -> Self {
        Questions(vec![question])
    }
}

impl From<Vec<Question>> for Questions {
    fn from(questions: Vec<Question>) -> Self {
        Questions(questions)
    }
}

impl<const N: usize> From<[Question; N]> for Questions {
    fn from(questions: [Question; N]) -> Self {
        Questions(questions.into())
    }
}

impl FromIterator<Question> for Questions {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        Questions(iter.into_iter().collect())
    }
}

impl IntoIterator for Questions {
    type Item = Question;
    type IntoIter = std::vec::IntoIter<Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
