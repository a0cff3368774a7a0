//! Entry points for running questions.

use crate::{
    answers::Answers,
    error::Result,
    prompts::{Prompt, PromptContext},
    question::Questions,
    registry::{global_registry, PromptRegistry},
    session::Session,
    ui::Console,
};

/// An isolated prompt environment: its own registry, console and options.
#[derive(Clone)]
pub struct PromptModule {
    registry: PromptRegistry,
    console: Console,
    non_interactive: bool,
}

impl PromptModule {
    /// Built-in prompt types on the process terminal.
    pub fn new() -> Self {
        Self::with_registry(PromptRegistry::defaults())
    }

    pub fn with_registry(registry: PromptRegistry) -> Self {
        Self { registry, console: Console::terminal(), non_interactive: false }
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub fn non_interactive(mut self, non_interactive: bool) -> Self {
        self.non_interactive = non_interactive;
        self
    }

    pub fn register_prompt<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(PromptContext) -> Result<Box<dyn Prompt>> + Send + Sync + 'static,
    {
        self.registry.register(name, factory);
        self
    }

    pub fn restore_default_prompts(&mut self) -> &mut Self {
        self.registry.restore_defaults();
        self
    }

    pub fn registry(&self) -> &PromptRegistry {
        &self.registry
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Asks `questions` in order and returns the answers.
    pub async fn prompt(&self, questions: impl Into<Questions>) -> Result<Answers> {
        self.prompt_with_answers(questions, Answers::new()).await
    }

    /// Like [`PromptModule::prompt`], with answers known up front. Questions
    /// whose name is already answered are not asked.
    pub async fn prompt_with_answers(
        &self,
        questions: impl Into<Questions>,
        answers: Answers,
    ) -> Result<Answers> {
        Session::new(&self.registry, &self.console)
            .non_interactive(self.non_interactive)
            .with_answers(answers)
            .run(questions)
            .await
    }

    /// Asks `questions`, then hands the answers to `on_complete`. The
    /// callback does not run when the session fails or is interrupted.
    pub async fn prompt_then<F, T>(&self, questions: impl Into<Questions>, on_complete: F) -> Result<T>
    where
        F: FnOnce(Answers) -> T,
    {
        let answers = self.prompt(questions).await?;
        Ok(on_complete(answers))
    }
}

impl Default for PromptModule {
    fn default() -> Self {
        Self::new()
    }
}

/// A new module with the built-in prompt types, independent of the
/// process-wide registry.
pub fn create_prompt_module() -> PromptModule {
    PromptModule::new()
}

/// Asks `questions` on the terminal using the process-wide registry.
pub async fn prompt(questions: impl Into<Questions>) -> Result<Answers> {
    PromptModule::with_registry(global_registry()).prompt(questions).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, question::Question, ui::BaseUi};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct Constant(Value);

    #[async_trait]
    impl Prompt for Constant {
        async fn run(&mut self, _ui: &mut BaseUi) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn custom_prompt_types_are_dispatched() {
        let (console, _terminal) = Console::virtual_terminal(80);
        let mut module = create_prompt_module().with_console(console);
        module.register_prompt("constant", |ctx: PromptContext| {
            Ok(Box::new(Constant(json!(ctx.name))) as Box<dyn Prompt>)
        });
        let answers = module.prompt(Question::new("constant", "echo")).await.unwrap();
        assert_eq!(answers.get("echo"), Some(&json!("echo")));

        module.restore_default_prompts();
        let err = module.prompt(Question::new("constant", "echo")).await.unwrap_err();
        assert!(matches!(err, Error::UnknownPromptType { .. }));
    }

    #[tokio::test]
    async fn prompt_then_runs_on_completion() {
        let (console, terminal) = Console::virtual_terminal(80);
        terminal.submit("Ada");
        let module = PromptModule::new().with_console(console);
        let greeting = module
            .prompt_then(Question::input("name"), |answers| {
                format!("hello {}", answers.get("name").and_then(Value::as_str).unwrap_or("?"))
            })
            .await
            .unwrap();
        assert_eq!(greeting, "hello Ada");
    }

    #[tokio::test]
    async fn prompt_then_skips_callback_on_interrupt() {
        let (console, terminal) = Console::virtual_terminal(80);
        terminal.interrupt();
        let module = PromptModule::new().with_console(console);
        let mut called = false;
        let result = module.prompt_then(Question::input("name"), |_| called = true).await;
        assert!(matches!(result, Err(Error::Interrupted)));
        assert!(!called);
    }
}
