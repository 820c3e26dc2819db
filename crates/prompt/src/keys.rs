//! Logical key translation and selector policy.

use prompt_provider_core::{PromptReference, DEFAULT_LABEL};
use std::collections::HashMap;
use std::fmt;

/// Map a logical key to its registry-native key.
///
/// Unmapped keys, and keys mapped to a blank registry key, are used verbatim.
pub fn translate<'a>(
    logical_key: &'a str,
    mappings: &'a HashMap<String, PromptReference>,
) -> &'a str {
    match mappings.get(logical_key) {
        Some(reference) if !reference.registry_key.trim().is_empty() => {
            reference.registry_key.trim()
        }
        _ => logical_key,
    }
}

/// The single version-or-label selector sent to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Version(u32),
    Label(String),
}

impl Selector {
    /// Pick the selector for a read.
    ///
    /// Precedence: caller version, caller label, mapping version, mapping
    /// label, then the `production` label.
    pub fn choose(
        version: Option<u32>,
        label: Option<&str>,
        reference: Option<&PromptReference>,
    ) -> Self {
        let label = label.map(str::trim).filter(|l| !l.is_empty());
        let pinned_label = reference
            .and_then(|r| r.label.as_deref())
            .map(str::trim)
            .filter(|l| !l.is_empty());

        if let Some(version) = version {
            Self::Version(version)
        } else if let Some(label) = label {
            Self::Label(label.to_string())
        } else if let Some(version) = reference.and_then(|r| r.version) {
            Self::Version(version)
        } else if let Some(label) = pinned_label {
            Self::Label(label.to_string())
        } else {
            Self::Label(DEFAULT_LABEL.to_string())
        }
    }

    pub fn version(&self) -> Option<u32> {
        match self {
            Self::Version(version) => Some(*version),
            Self::Label(_) => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Version(_) => None,
            Self::Label(label) => Some(label),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version(version) => write!(f, "version {}", version),
            Self::Label(label) => write!(f, "label '{}'", label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mappings() -> HashMap<String, PromptReference> {
        let mut map = HashMap::new();
        map.insert(
            "ChatTitle".to_string(),
            PromptReference::new("chat.title.generate"),
        );
        map.insert("Blank".to_string(), PromptReference::new("   "));
        map
    }

    #[test]
    fn test_translate_mapped_key() {
        assert_eq!(translate("ChatTitle", &mappings()), "chat.title.generate");
    }

    #[test]
    fn test_translate_unmapped_key_is_verbatim() {
        assert_eq!(translate("SystemDefault", &mappings()), "SystemDefault");
    }

    #[test]
    fn test_translate_blank_mapping_is_verbatim() {
        assert_eq!(translate("Blank", &mappings()), "Blank");
    }

    #[test]
    fn test_default_label() {
        assert_eq!(
            Selector::choose(None, None, None),
            Selector::Label("production".to_string())
        );
        assert_eq!(
            Selector::choose(None, Some("  "), None),
            Selector::Label("production".to_string())
        );
    }

    #[test]
    fn test_explicit_version_suppresses_label() {
        let selector = Selector::choose(Some(3), Some("staging"), None);
        assert_eq!(selector.version(), Some(3));
        assert_eq!(selector.label(), None);
    }

    #[test]
    fn test_caller_selector_beats_pinned_reference() {
        let reference = PromptReference::new("k").with_version(7);
        assert_eq!(
            Selector::choose(None, Some("staging"), Some(&reference)),
            Selector::Label("staging".to_string())
        );
    }

    #[test]
    fn test_pinned_reference() {
        let pinned_version = PromptReference::new("k").with_version(7).with_label("staging");
        assert_eq!(
            Selector::choose(None, None, Some(&pinned_version)),
            Selector::Version(7)
        );

        let pinned_label = PromptReference::new("k").with_label("staging");
        assert_eq!(
            Selector::choose(None, None, Some(&pinned_label)),
            Selector::Label("staging".to_string())
        );
    }
}
