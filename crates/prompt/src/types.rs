//! Prompt types returned and accepted by the resolver.

use prompt_provider_core::ChatMessage;
use prompt_provider_registry::{PromptConfig, PromptContent, PromptRecord, PromptType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::compile::compile;
use prompt_provider_core::AppResult;

/// Which tier answered a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptSource {
    Registry,
    Local,
}

impl fmt::Display for PromptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry => f.write_str("registry"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// A prompt answered by the registry or by local defaults.
///
/// Local answers carry only the key, content and source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPrompt {
    /// Key the caller asked for
    #[serde(rename = "promptKey")]
    pub prompt_key: String,

    /// Registry-native name of the answering record
    #[serde(rename = "registryKey", skip_serializing_if = "Option::is_none")]
    pub registry_key: Option<String>,

    pub content: PromptContent,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub prompt_type: Option<PromptType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PromptConfig>,

    pub source: PromptSource,
}

impl ResolvedPrompt {
    /// Build a registry answer for `prompt_key`.
    pub fn from_registry(prompt_key: impl Into<String>, record: PromptRecord) -> Self {
        Self {
            prompt_key: prompt_key.into(),
            registry_key: Some(record.name),
            content: record.prompt,
            version: Some(record.version),
            labels: Some(record.labels),
            tags: Some(record.tags),
            prompt_type: Some(record.prompt_type),
            config: record.config,
            source: PromptSource::Registry,
        }
    }

    /// Build a local-defaults answer for `prompt_key`.
    pub fn local(prompt_key: impl Into<String>, content: PromptContent) -> Self {
        Self {
            prompt_key: prompt_key.into(),
            registry_key: None,
            content,
            version: None,
            labels: None,
            tags: None,
            prompt_type: None,
            config: None,
            source: PromptSource::Local,
        }
    }

    /// Text content, if this is a text prompt.
    pub fn text(&self) -> Option<&str> {
        self.content.as_text()
    }

    /// Chat messages, if this is a chat prompt.
    pub fn messages(&self) -> Option<&[ChatMessage]> {
        self.content.as_chat()
    }

    /// Render `{{variable}}` placeholders in the content.
    pub fn compile(&self, variables: &HashMap<String, String>) -> AppResult<PromptContent> {
        compile(&self.content, variables)
    }
}

/// Request to create a new prompt version under a logical key.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePromptRequest {
    pub prompt_key: String,
    pub content: PromptContent,
    pub commit_message: Option<String>,
    pub labels: Vec<String>,
    pub tags: Vec<String>,
    pub config: Option<PromptConfig>,
}

impl CreatePromptRequest {
    /// Create a text prompt request.
    pub fn text(prompt_key: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(prompt_key, PromptContent::Text(content.into()))
    }

    /// Create a chat prompt request.
    pub fn chat(prompt_key: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self::new(prompt_key, PromptContent::Chat(messages))
    }

    fn new(prompt_key: impl Into<String>, content: PromptContent) -> Self {
        Self {
            prompt_key: prompt_key.into(),
            content,
            commit_message: None,
            labels: Vec::new(),
            tags: Vec::new(),
            config: None,
        }
    }

    /// Attach a commit message.
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }

    /// Labels to place on the new version.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Tags for the prompt.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Model-tuning metadata.
    pub fn with_config(mut self, config: PromptConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// One entry of a batch request: a logical key with its own selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptQuery {
    #[serde(rename = "promptKey")]
    pub prompt_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PromptQuery {
    /// Query a key with no explicit selector.
    pub fn new(prompt_key: impl Into<String>) -> Self {
        Self {
            prompt_key: prompt_key.into(),
            version: None,
            label: None,
        }
    }

    /// Select a specific version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Select a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Result of a batch resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Hits, in request order
    pub prompts: Vec<ResolvedPrompt>,

    /// Keys that missed in both tiers, in request order
    #[serde(rename = "notFound")]
    pub not_found: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PromptRecord {
        PromptRecord {
            name: "chat.title.generate".to_string(),
            prompt_type: PromptType::Text,
            prompt: PromptContent::Text("Title it".to_string()),
            config: Some(PromptConfig {
                model: Some("gpt-4o".to_string()),
                ..PromptConfig::default()
            }),
            version: 3,
            labels: vec!["production".to_string()],
            tags: vec!["chat".to_string()],
            commit_message: None,
        }
    }

    #[test]
    fn test_from_registry() {
        let resolved = ResolvedPrompt::from_registry("ChatTitle", record());
        assert_eq!(resolved.prompt_key, "ChatTitle");
        assert_eq!(resolved.registry_key.as_deref(), Some("chat.title.generate"));
        assert_eq!(resolved.version, Some(3));
        assert_eq!(resolved.prompt_type, Some(PromptType::Text));
        assert_eq!(resolved.source, PromptSource::Registry);
        assert_eq!(resolved.text(), Some("Title it"));
    }

    #[test]
    fn test_local_has_no_registry_metadata() {
        let resolved = ResolvedPrompt::local("ChatTitle", PromptContent::Text("x".to_string()));
        assert_eq!(resolved.source, PromptSource::Local);
        assert!(resolved.version.is_none());
        assert!(resolved.labels.is_none());
        assert!(resolved.tags.is_none());
        assert!(resolved.prompt_type.is_none());
        assert!(resolved.config.is_none());

        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["source"], "Local");
        assert!(json.get("version").is_none());
    }
}
