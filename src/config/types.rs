//! Field types of question files

use crate::{choice::ChoiceInput, constants::validation};
use serde::Deserialize;

/// `when:` is a literal flag or an expression over earlier answers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum When {
    Flag(bool),
    Expr(String),
}

impl Default for When {
    fn default() -> Self {
        When::Flag(true)
    }
}

/// `choices:` is a list or an expression that evaluates to one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChoicesSpec {
    List(Vec<ChoiceInput>),
    Expr(String),
}

/// `validate:` rule. `condition` sees the answers plus the candidate as
/// `value`; when it is false the rendered `error_message` is shown.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationRule {
    #[serde(default = "get_default_condition")]
    pub condition: String,
    #[serde(default = "get_default_error_message")]
    pub error_message: String,
}

fn get_default_error_message() -> String {
    validation::INVALID_ANSWER.to_string()
}

pub fn get_default_condition() -> String {
    validation::DEFAULT_CONDITION.to_string()
}

pub(crate) fn get_default_paginated() -> bool {
    true
}
