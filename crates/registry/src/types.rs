//! Registry wire types.
//!
//! This module defines the request and response shapes exchanged with the
//! prompt registry. Field names follow the registry's JSON conventions.

use prompt_provider_core::{AppError, AppResult, ChatMessage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptType {
    Text,
    Chat,
}

impl PromptType {
    /// Get the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Chat => "chat",
        }
    }

    /// Parse a prompt type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "chat" => Some(Self::Chat),
            _ => None,
        }
    }
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prompt body: a plain string or an ordered list of chat messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptContent {
    Text(String),
    Chat(Vec<ChatMessage>),
}

impl PromptContent {
    /// The prompt type matching this content's shape.
    pub fn prompt_type(&self) -> PromptType {
        match self {
            Self::Text(_) => PromptType::Text,
            Self::Chat(_) => PromptType::Chat,
        }
    }

    /// Text content, if this is a text prompt.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Chat(_) => None,
        }
    }

    /// Chat messages, if this is a chat prompt.
    pub fn as_chat(&self) -> Option<&[ChatMessage]> {
        match self {
            Self::Text(_) => None,
            Self::Chat(messages) => Some(messages),
        }
    }

    /// Blank text, no messages, or only messages with blank content.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Chat(messages) => messages.iter().all(|m| m.content.trim().is_empty()),
        }
    }
}

impl From<String> for PromptContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for PromptContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<ChatMessage>> for PromptContent {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self::Chat(messages)
    }
}

/// Model-tuning metadata attached to a prompt version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(
        rename = "supported_languages",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub supported_languages: Option<Vec<String>>,
}

/// A single immutable prompt version as stored by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub name: String,

    #[serde(rename = "type")]
    pub prompt_type: PromptType,

    pub prompt: PromptContent,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PromptConfig>,

    pub version: u32,

    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(
        rename = "commitMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub commit_message: Option<String>,
}

/// One entry of the prompt listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSummary {
    pub name: String,

    #[serde(rename = "type")]
    pub prompt_type: PromptType,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(
        rename = "lastUpdatedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<u32>>,

    #[serde(rename = "lastConfig", default, skip_serializing_if = "Option::is_none")]
    pub last_config: Option<PromptConfig>,
}

/// Paginated envelope returned by the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptListPage {
    #[serde(default)]
    pub data: Option<Vec<PromptSummary>>,

    #[serde(default)]
    pub meta: Option<ListMeta>,
}

/// Pagination metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub page: u32,

    #[serde(default)]
    pub limit: u32,

    #[serde(rename = "totalItems", default)]
    pub total_items: u32,

    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
}

/// Trim labels and drop blank and repeated entries, keeping first-seen order.
pub fn normalize_labels(labels: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for label in labels.iter().map(|l| l.trim()) {
        if !label.is_empty() && !normalized.iter().any(|l| l == label) {
            normalized.push(label.to_string());
        }
    }
    normalized
}

/// Request body for creating a new prompt version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePromptVersion {
    pub name: String,

    pub prompt: PromptContent,

    #[serde(rename = "type")]
    pub prompt_type: PromptType,

    #[serde(rename = "commitMessage", skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PromptConfig>,

    pub labels: Vec<String>,

    pub tags: Vec<String>,
}

impl CreatePromptVersion {
    /// Create a request whose type follows the content's shape.
    pub fn new(name: impl Into<String>, prompt: impl Into<PromptContent>) -> Self {
        let prompt = prompt.into();
        Self {
            name: name.into(),
            prompt_type: prompt.prompt_type(),
            prompt,
            commit_message: None,
            config: None,
            labels: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Attach a commit message.
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }

    /// Labels to place on the new version. Blank and repeated labels are dropped.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = normalize_labels(&labels);
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

    /// Reject blank names, blank content and type/content mismatches.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "Prompt name is required".to_string(),
            ));
        }

        if self.prompt.is_blank() {
            return Err(AppError::InvalidArgument(
                "Prompt content is required".to_string(),
            ));
        }

        if self.prompt.prompt_type() != self.prompt_type {
            return Err(AppError::InvalidArgument(format!(
                "Prompt type '{}' does not match {} content",
                self.prompt_type,
                self.prompt.prompt_type()
            )));
        }

        Ok(())
    }
}

/// Request body for moving labels onto a version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateLabelsBody {
    #[serde(rename = "newLabels")]
    pub new_labels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_record_deserialization() {
        let json = r#"{
            "name": "chat.title.generate",
            "type": "text",
            "prompt": "Summarize {{conversation}}",
            "config": {"model": "gpt-4o", "temperature": 0.2, "supported_languages": ["en", "fr"]},
            "version": 4,
            "labels": ["production", "latest"],
            "tags": ["chat"]
        }"#;

        let record: PromptRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.prompt_type, PromptType::Text);
        assert_eq!(record.prompt.as_text(), Some("Summarize {{conversation}}"));
        assert_eq!(record.version, 4);
        let config = record.config.unwrap();
        assert_eq!(config.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.supported_languages.unwrap().len(), 2);
    }

    #[test]
    fn test_chat_record_deserialization() {
        let json = r#"{
            "name": "tutor",
            "type": "chat",
            "prompt": [{"role": "system", "content": "Be kind."}],
            "config": null,
            "version": 1
        }"#;

        let record: PromptRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.prompt_type, PromptType::Chat);
        assert_eq!(record.prompt.as_chat().unwrap()[0].role, "system");
        assert!(record.labels.is_empty());
        assert!(record.config.is_none());
    }

    #[test]
    fn test_list_page_without_data() {
        let page: PromptListPage = serde_json::from_str(r#"{"meta": {"page": 1}}"#).unwrap();
        assert!(page.data.is_none());
        assert_eq!(page.meta.unwrap().page, 1);
    }

    #[test]
    fn test_list_page_ignores_pagination_block() {
        let page: PromptListPage = serde_json::from_str(
            r#"{"data": [], "meta": {"page": 2, "totalPages": 3}, "pagination": {"page": 2}}"#,
        )
        .unwrap();
        assert_eq!(page.data.map(|d| d.len()), Some(0));
        assert_eq!(page.meta.unwrap().total_pages, 3);
    }

    #[test]
    fn test_create_request_serialization() {
        let request = CreatePromptVersion::new("chat.title.generate", "Title: {{text}}")
            .with_labels(vec!["staging".to_string()]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["prompt"], "Title: {{text}}");
        assert_eq!(value["labels"][0], "staging");
        assert!(value.get("commitMessage").is_none());
    }

    #[test]
    fn test_create_request_validation() {
        assert!(CreatePromptVersion::new(" ", "x").validate().is_err());
        assert!(CreatePromptVersion::new("a", "  ").validate().is_err());
        assert!(CreatePromptVersion::new("a", Vec::<ChatMessage>::new())
            .validate()
            .is_err());

        let mut mismatched = CreatePromptVersion::new("a", "text body");
        mismatched.prompt_type = PromptType::Chat;
        assert!(matches!(
            mismatched.validate(),
            Err(AppError::InvalidArgument(_))
        ));

        assert!(CreatePromptVersion::new("a", "body").validate().is_ok());
    }

    #[test]
    fn test_normalize_labels() {
        let labels = vec![
            " production ".to_string(),
            "  ".to_string(),
            "staging".to_string(),
            "production".to_string(),
        ];
        assert_eq!(
            normalize_labels(&labels),
            vec!["production".to_string(), "staging".to_string()]
        );

        let request = CreatePromptVersion::new("a", "x").with_labels(labels);
        assert_eq!(request.labels, vec!["production".to_string(), "staging".to_string()]);
    }

    #[test]
    fn test_prompt_type_parsing() {
        assert_eq!(PromptType::parse("TEXT"), Some(PromptType::Text));
        assert_eq!(PromptType::parse("chat"), Some(PromptType::Chat));
        assert_eq!(PromptType::parse("image"), None);
    }
}
