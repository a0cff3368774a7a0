//! Prompt type registry
//!
//! Maps prompt type names to the factories that build them. Every
//! [`PromptModule`](crate::module::PromptModule) owns its own registry; the
//! process-wide one backs the top-level [`prompt`](crate::prompt) function.

use crate::{
    error::{Error, Result},
    prompts::{
        CheckboxPrompt, ConfirmPrompt, EditorPrompt, ExpandPrompt, InputPrompt, ListPrompt,
        PasswordPrompt, Prompt, PromptContext, PromptFactory, RawListPrompt,
    },
};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::{
    fmt,
    sync::{Arc, LazyLock},
};

/// Name -> factory table.
#[derive(Clone)]
pub struct PromptRegistry {
    prompts: IndexMap<String, PromptFactory>,
}

impl PromptRegistry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self { prompts: IndexMap::new() }
    }

    /// A fresh registry holding the built-in prompt types.
    pub fn defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("input", InputPrompt::create);
        registry.register("password", PasswordPrompt::create);
        registry.register("confirm", ConfirmPrompt::create);
        registry.register("list", ListPrompt::create);
        registry.register("rawlist", RawListPrompt::create);
        registry.register("checkbox", CheckboxPrompt::create);
        registry.register("expand", ExpandPrompt::create);
        registry.register("editor", EditorPrompt::create);
        registry
    }

    /// Binds `name` to `factory`, replacing any earlier binding.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(PromptContext) -> Result<Box<dyn Prompt>> + Send + Sync + 'static,
    {
        self.register_factory(name, Arc::new(factory))
    }

    pub fn register_factory(&mut self, name: impl Into<String>, factory: PromptFactory) -> &mut Self {
        let name = name.into();
        if self.prompts.insert(name.clone(), factory).is_some() {
            log::debug!("Prompt type '{name}' re-registered");
        }
        self
    }

    /// Drops every custom binding and restores the built-in set.
    pub fn restore_defaults(&mut self) -> &mut Self {
        *self = Self::defaults();
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prompts.contains_key(name)
    }

    /// Looks up the factory for `kind`, as asked for by `question`.
    pub fn resolve(&self, kind: &str, question: &str) -> Result<&PromptFactory> {
        self.prompts.get(kind).ok_or_else(|| Error::UnknownPromptType {
            kind: kind.to_string(),
            question: question.to_string(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.prompts.keys().map(String::as_str)
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

impl fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptRegistry").field("prompts", &self.names().collect::<Vec<_>>()).finish()
    }
}

static GLOBAL_REGISTRY: LazyLock<RwLock<PromptRegistry>> =
    LazyLock::new(|| RwLock::new(PromptRegistry::defaults()));

/// Registers a prompt type for every later top-level [`prompt`](crate::prompt) call.
pub fn register_prompt<F>(name: impl Into<String>, factory: F)
where
    F: Fn(PromptContext) -> Result<Box<dyn Prompt>> + Send + Sync + 'static,
{
    GLOBAL_REGISTRY.write().register(name, factory);
}

/// Resets the process-wide registry to the built-in prompt types.
pub fn restore_default_prompts() {
    GLOBAL_REGISTRY.write().restore_defaults();
}

/// A snapshot of the process-wide registry.
pub fn global_registry() -> PromptRegistry {
    GLOBAL_REGISTRY.read().clone()
}
