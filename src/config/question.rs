//! Question definitions from files and their conversion to [`Question`]s

use super::types::{get_default_paginated, ChoicesSpec, ValidationRule, When};
use crate::{
    answers::Answers,
    choice::ChoiceInput,
    question::{Dynamic, Question, Validation},
    renderer::TemplateRenderer,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

type Engine = Arc<dyn TemplateRenderer>;

/// One question as written in a question file
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSpec {
    /// Registered prompt type; plain input when absent
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Template over earlier answers
    #[serde(default)]
    pub message: Option<String>,
    /// String defaults are templates; anything else is used as is
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub choices: Option<ChoicesSpec>,
    #[serde(default)]
    pub when: When,
    #[serde(default)]
    pub validate: Option<ValidationRule>,
    /// Template over earlier answers and `value`
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default = "get_default_paginated")]
    pub paginated: bool,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub mask: Option<char>,
}

/// Whether `text` needs rendering at all.
fn is_template(text: &str) -> bool {
    text.contains("{{") || text.contains("{%")
}

/// Template context: the answers so far, plus the candidate answer.
fn context(answers: &Answers, value: Option<&Value>) -> Value {
    let mut context = answers.to_json();
    if let (Some(value), Some(object)) = (value, context.as_object_mut()) {
        object.insert("value".to_string(), value.clone());
    }
    context
}

impl QuestionSpec {
    pub fn into_question(self, name: impl Into<String>, engine: &Engine) -> Question {
        let mut question = Question::untyped(name);
        question.kind = self.kind;
        question.message = self.message.map(|message| rendered(message, engine));
        question.default = self.default.map(|default| match default {
            Value::String(text) if is_template(&text) => {
                let engine = Arc::clone(engine);
                Dynamic::derived(move |answers| {
                    Ok(Value::String(engine.render(&text, &context(answers, None))?))
                })
            }
            literal => Dynamic::Literal(literal),
        });
        question.choices = self.choices.map(|choices| match choices {
            ChoicesSpec::List(items) => Dynamic::Literal(items),
            ChoicesSpec::Expr(expr) => {
                let engine = Arc::clone(engine);
                Dynamic::derived(move |answers| {
                    let value = engine.evaluate(&expr, &context(answers, None))?;
                    Ok(serde_json::from_value::<Vec<ChoiceInput>>(value)?)
                })
            }
        });
        question.when = match self.when {
            When::Flag(ask) => Dynamic::Literal(ask),
            When::Expr(expr) => {
                let engine = Arc::clone(engine);
                Dynamic::derived(move |answers| {
                    Ok(engine.execute_expression(&expr, &context(answers, None))?)
                })
            }
        };
        if let Some(rule) = self.validate {
            let engine = Arc::clone(engine);
            question = question.try_validate(move |value, answers| {
                let ctx = context(answers, Some(value));
                if engine.execute_expression(&rule.condition, &ctx)? {
                    Ok(Validation::Valid)
                } else {
                    Ok(Validation::Message(engine.render(&rule.error_message, &ctx)?))
                }
            });
        }
        if let Some(filter) = self.filter {
            let engine = Arc::clone(engine);
            question = question.filter(move |value, answers| {
                Ok(Value::String(engine.render(&filter, &context(answers, Some(&value)))?))
            });
        }
        question.paginated = self.paginated;
        question.page_size = self.page_size;
        question.mask = self.mask;
        question
    }
}

fn rendered(text: String, engine: &Engine) -> Dynamic<String> {
    if !is_template(&text) {
        return Dynamic::Literal(text);
    }
    let engine = Arc::clone(engine);
    Dynamic::derived(move |answers| Ok(engine.render(&text, &context(answers, None))?))
}
