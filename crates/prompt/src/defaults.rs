//! Local default prompts and key mappings.

use prompt_provider_core::{
    AppConfig, ChatMessage, PromptKeyOptions, PromptReference, PromptsOptions,
};
use std::collections::HashMap;

/// Read-only source of local fallback content and logical key mappings.
///
/// A missing entry is an absent map key, never an error.
pub trait DefaultPromptsSource: Send + Sync {
    /// Plain-text defaults by logical key.
    fn text_defaults(&self) -> &HashMap<String, String>;

    /// Chat-message defaults by logical key.
    fn chat_defaults(&self) -> &HashMap<String, Vec<ChatMessage>>;

    /// Logical key -> registry reference.
    fn key_mappings(&self) -> &HashMap<String, PromptReference>;
}

/// Default prompts taken from application configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigDefaultPrompts {
    prompts: PromptsOptions,
    prompt_keys: PromptKeyOptions,
}

impl ConfigDefaultPrompts {
    pub fn new(prompts: PromptsOptions, prompt_keys: PromptKeyOptions) -> Self {
        Self {
            prompts,
            prompt_keys,
        }
    }

    /// Copy the tables out of a loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.prompts.clone(), config.prompt_keys.clone())
    }

    /// Add a text default.
    pub fn with_text(mut self, key: impl Into<String>, content: impl Into<String>) -> Self {
        self.prompts.defaults.insert(key.into(), content.into());
        self
    }

    /// Add a chat default.
    pub fn with_chat(mut self, key: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        self.prompts.chat_defaults.insert(key.into(), messages);
        self
    }

    /// Add a key mapping.
    pub fn with_mapping(mut self, key: impl Into<String>, reference: PromptReference) -> Self {
        self.prompt_keys.insert(key.into(), reference);
        self
    }
}

impl DefaultPromptsSource for ConfigDefaultPrompts {
    fn text_defaults(&self) -> &HashMap<String, String> {
        &self.prompts.defaults
    }

    fn chat_defaults(&self) -> &HashMap<String, Vec<ChatMessage>> {
        &self.prompts.chat_defaults
    }

    fn key_mappings(&self) -> &HashMap<String, PromptReference> {
        &self.prompt_keys
    }
}
