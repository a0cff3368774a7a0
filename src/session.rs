//! The question pipeline
//!
//! A [`Session`] walks an ordered list of questions. For each one it decides
//! whether to ask, resolves every derived field against the answers so far,
//! asks through the registered prompt, then filters, validates and records
//! the answer before moving on.

use crate::{
    answers::Answers,
    choice::Choices,
    constants::{validation::INVALID_ANSWER, DEFAULT_PAGE_SIZE},
    error::{Error, Result},
    prompts::{PromptContext, PromptFactory},
    question::{Question, Questions, Validation},
    registry::PromptRegistry,
    ui::{BaseUi, Console},
};
use serde_json::Value;
use std::{collections::HashSet, sync::Arc};

/// Where a question is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuestionState {
    Prefilled,
    Skipped,
    Asking,
    Rejected,
    Answered,
    Defaulted,
    Unanswered,
}

/// Fields of a question resolved against the current answers.
struct Resolved {
    choices: Choices,
    default: Option<Value>,
}

/// One run of the pipeline over a list of questions.
pub struct Session<'a> {
    registry: &'a PromptRegistry,
    console: &'a Console,
    non_interactive: bool,
    answers: Answers,
    prefilled: HashSet<String>,
}

impl<'a> Session<'a> {
    pub fn new(registry: &'a PromptRegistry, console: &'a Console) -> Self {
        Self {
            registry,
            console,
            non_interactive: false,
            answers: Answers::new(),
            prefilled: HashSet::new(),
        }
    }

    /// Commit defaults instead of asking.
    pub fn non_interactive(mut self, non_interactive: bool) -> Self {
        self.non_interactive = non_interactive;
        self
    }

    /// Seeds answers; questions with a pre-filled name are not asked.
    pub fn with_answers(mut self, answers: Answers) -> Self {
        self.prefilled = answers.keys().map(str::to_string).collect();
        self.answers = answers;
        self
    }

    pub async fn run(mut self, questions: impl Into<Questions>) -> Result<Answers> {
        let Questions(questions) = questions.into();

        // every type must resolve before anything is drawn
        for question in &questions {
            self.registry.resolve(question.effective_kind(), &question.name)?;
        }

        log::debug!("Starting session with {} question(s)", questions.len());
        for question in &questions {
            let state = self.process(question).await?;
            log::debug!("Question '{}': {state:?}", question.name);
        }
        log::debug!("Session complete with {} answer(s)", self.answers.len());
        Ok(self.answers)
    }

    async fn process(&mut self, question: &Question) -> Result<QuestionState> {
        if self.prefilled.contains(&question.name) {
            return Ok(QuestionState::Prefilled);
        }
        if !question.when.resolve(&self.answers, &question.name, "when")? {
            return Ok(QuestionState::Skipped);
        }
        let resolved = self.resolve(question)?;

        if self.non_interactive {
            return match resolved.default {
                Some(default) => {
                    let value = self.filter(question, default)?;
                    self.answers.insert(question.name.clone(), value);
                    Ok(QuestionState::Defaulted)
                }
                None => Ok(QuestionState::Unanswered),
            };
        }

        let factory = Arc::clone(self.registry.resolve(question.effective_kind(), &question.name)?);
        self.ask(question, resolved, factory).await
    }

    fn resolve(&self, question: &Question) -> Result<Resolved> {
        let choices = match &question.choices {
            Some(choices) => {
                let inputs = choices.resolve(&self.answers, &question.name, "choices")?;
                Choices::normalize_all(&inputs, &question.name, &self.answers)?
            }
            None => Choices::default(),
        };
        let default = question.resolve_default(&self.answers)?;
        Ok(Resolved { choices, default })
    }

    async fn ask(
        &mut self,
        question: &Question,
        resolved: Resolved,
        factory: PromptFactory,
    ) -> Result<QuestionState> {
        let message = question.resolve_message(&self.answers)?;
        let mut ui = BaseUi::new(self.console)?;
        let mut error = None;

        loop {
            log::debug!("Question '{}': {:?}", question.name, QuestionState::Asking);
            let ctx = PromptContext {
                name: question.name.clone(),
                message: message.clone(),
                default: resolved.default.clone(),
                choices: resolved.choices.clone(),
                paginated: question.paginated,
                page_size: question.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
                mask: question.mask,
                answers: self.answers.clone(),
                error: error.take(),
            };
            let raw = factory(ctx)?.run(&mut ui).await?;
            let filtered = self.filter(question, raw.clone())?;

            match self.validate(question, &raw)? {
                Validation::Valid => {
                    self.answers.insert(question.name.clone(), filtered);
                    ui.finish()?;
                    ui.close();
                    return Ok(QuestionState::Answered);
                }
                Validation::Invalid => error = Some(INVALID_ANSWER.to_string()),
                Validation::Message(message) => error = Some(message),
            }
            log::debug!("Question '{}': {:?}", question.name, QuestionState::Rejected);
        }
    }

    fn filter(&self, question: &Question, value: Value) -> Result<Value> {
        match &question.filter {
            Some(filter) => filter(value, &self.answers)
                .map_err(|e| Error::derivation(&question.name, "filter", e)),
            None => Ok(value),
        }
    }

    fn validate(&self, question: &Question, value: &Value) -> Result<Validation> {
        match &question.validate {
            Some(validate) => validate(value, &self.answers)
                .map_err(|e| Error::derivation(&question.name, "validate", e)),
            None => Ok(Validation::Valid),
        }
    }
}
