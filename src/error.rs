use crate::constants::exit_codes;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YAMLParseError(#[from] serde_yaml::Error),

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// The question asks for a prompt type nobody registered.
    #[error("Question '{question}' uses prompt type '{kind}', which is not registered.")]
    UnknownPromptType { kind: String, question: String },

    /// A structured choice carried neither a `name` nor a `value`.
    #[error("Malformed choice: {0}.")]
    MalformedChoice(String),

    /// A derived field (`when`, `default`, `choices`, `message`, `filter`,
    /// `validate`, `disabled`) failed while being resolved.
    #[error("Failed to resolve '{field}' of question '{question}'. Original error: {source:#}")]
    Derivation {
        question: String,
        field: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A prompt refused the resolved question it was handed.
    #[error("Cannot prompt '{question}': {reason}.")]
    PromptConfig { question: String, reason: String },

    #[error("No question file found at '{path}'. Supported extensions: {extensions}.")]
    ConfigNotFound { path: String, extensions: String },

    /// Another UI instance currently owns the keypress stream.
    #[error("Keyboard input is already held by another prompt.")]
    InputBusy,

    /// The keypress source hung up before the prompt resolved.
    #[error("Keyboard input closed before the prompt was answered.")]
    InputClosed,

    #[error("Editor failed: {0}.")]
    EditorError(String),

    /// Forced close (Ctrl+C). A teardown path, not a failure of the questions.
    #[error("Prompt interrupted.")]
    Interrupted,
}

/// Convenience type alias for Results with the crate error as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn derivation(
        question: &str,
        field: &'static str,
        source: anyhow::Error,
    ) -> Self {
        Error::Derivation { question: question.to_string(), field, source }
    }

    pub(crate) fn prompt_config(question: &str, reason: impl Into<String>) -> Self {
        Error::PromptConfig { question: question.to_string(), reason: reason.into() }
    }
}

/// Default error handler that prints the error and exits the program.
///
/// An interrupted session is not reported; the process exits with the
/// conventional SIGINT status instead.
pub fn default_error_handler(err: Error) {
    if matches!(err, Error::Interrupted) {
        std::process::exit(exit_codes::INTERRUPTED);
    }
    eprintln!("{err}");
    std::process::exit(exit_codes::FAILURE);
}
