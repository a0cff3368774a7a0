//! Interactive command-line questions.
//!
//! Describe what to ask as an ordered list of [`Question`]s, hand them to
//! [`prompt`] or a [`PromptModule`], and get the [`Answers`] back once every
//! question has been answered, skipped or filled in.

/// Answers collected so far.
pub mod answers;

/// Choice lists: options, separators and their normalization.
pub mod choice;

/// Handles argument parsing and the `inquiry` binary's commands.
pub mod cli;

/// Question files.
pub mod config;

pub mod constants;

/// Defines custom error types.
pub mod error;

/// Entry points for running questions.
pub mod module;

/// Built-in prompt types and the contract custom ones implement.
pub mod prompts;

pub mod question;

/// Prompt type name to factory mapping.
pub mod registry;

/// Template rendering for question files.
pub mod renderer;

/// The question pipeline.
pub mod session;

/// Terminal plumbing shared by every prompt.
pub mod ui;

pub use answers::Answers;
pub use choice::{ChoiceInput, ChoiceOption, Separator};
pub use error::{Error, Result};
pub use module::{create_prompt_module, prompt, PromptModule};
pub use prompts::{Prompt, PromptContext, PromptFactory};
pub use question::{Dynamic, Question, Questions, Validation};
pub use registry::{register_prompt, restore_default_prompts, PromptRegistry};
pub use ui::{BarLog, BaseUi, BottomBar, Console, Keypress, VirtualTerminal};
