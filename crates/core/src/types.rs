//! Shared value types used by configuration, the registry client and the resolver.

use serde::{Deserialize, Serialize};

/// Label requested when neither a version nor a label is selected.
pub const DEFAULT_LABEL: &str = "production";

/// A single message of a chat prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role (e.g., "system", "user", "assistant")
    pub role: String,

    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Where a logical prompt key lives in the registry.
///
/// In configuration files:
/// ```yaml
/// promptKeys:
///   ChatTitle:
///     key: chat.title.generate
///     label: production
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptReference {
    /// Registry-native prompt name
    #[serde(rename = "key", alias = "registryKey")]
    pub registry_key: String,

    /// Pinned version (takes precedence over the label)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Pinned label (e.g., "production", "staging", "latest")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PromptReference {
    /// Create a reference with no pinned selector.
    pub fn new(registry_key: impl Into<String>) -> Self {
        Self {
            registry_key: registry_key.into(),
            version: None,
            label: None,
        }
    }

    /// Pin a specific version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Pin a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_deserialization() {
        let yaml = "key: chat.title.generate\nversion: 3\n";
        let reference: PromptReference = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(reference.registry_key, "chat.title.generate");
        assert_eq!(reference.version, Some(3));
        assert_eq!(reference.label, None);
    }

    #[test]
    fn test_reference_accepts_registry_key_alias() {
        let yaml = "registryKey: prompts.system.default\nlabel: staging\n";
        let reference: PromptReference = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(reference.registry_key, "prompts.system.default");
        assert_eq!(reference.label.as_deref(), Some("staging"));
    }
}
