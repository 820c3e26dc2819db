//! Configuration management for the prompt provider.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Config file (`prompts.yaml` or the path in `PROMPT_PROVIDER_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! The configuration is read once at startup and is immutable afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::types::{ChatMessage, PromptReference};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "prompts.yaml";

/// Registry providers understood by the client factory.
pub const KNOWN_PROVIDERS: [&str; 2] = ["langfuse", "memory"];

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file the values were read from, if any
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// Log level override
    #[serde(skip)]
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    #[serde(skip)]
    pub verbose: bool,

    /// Disable colored output
    #[serde(skip)]
    pub no_color: bool,

    /// Registry address and credentials
    #[serde(default)]
    pub registry: RegistryOptions,

    /// Local default prompt content
    #[serde(default)]
    pub prompts: PromptsOptions,

    /// Logical key -> registry reference mapping
    #[serde(rename = "promptKeys", default)]
    pub prompt_keys: PromptKeyOptions,
}

/// Registry connection settings.
///
/// Absence of any of `base_url`, `public_key` or `secret_key` means the
/// registry is not configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryOptions {
    /// Registry backend ("langfuse" or "memory")
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(rename = "baseUrl", default)]
    pub base_url: Option<String>,

    #[serde(rename = "publicKey", default)]
    pub public_key: Option<String>,

    #[serde(rename = "secretKey", default)]
    pub secret_key: Option<String>,

    /// Request timeout in seconds (transport policy)
    #[serde(rename = "timeout", default)]
    pub timeout_secs: Option<u64>,
}

fn default_provider() -> String {
    "langfuse".to_string()
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: None,
            public_key: None,
            secret_key: None,
            timeout_secs: None,
        }
    }
}

impl RegistryOptions {
    /// Create options for a registry at `base_url` with the given key pair.
    pub fn new(
        base_url: impl Into<String>,
        public_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: Some(base_url.into()),
            public_key: Some(public_key.into()),
            secret_key: Some(secret_key.into()),
            ..Self::default()
        }
        .normalized()
    }

    /// Whether base address and both keys are present and non-blank.
    pub fn is_configured(&self) -> bool {
        [&self.base_url, &self.public_key, &self.secret_key]
            .iter()
            .all(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    /// Trim all values and drop the blank ones.
    pub fn normalized(mut self) -> Self {
        self.base_url = trimmed(self.base_url);
        self.public_key = trimmed(self.public_key);
        self.secret_key = trimmed(self.secret_key);
        self.provider = self.provider.trim().to_lowercase();
        if self.provider.is_empty() {
            self.provider = default_provider();
        }
        self
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Local default prompt tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsOptions {
    /// Plain-text defaults by logical key
    #[serde(default)]
    pub defaults: HashMap<String, String>,

    /// Chat-message defaults by logical key
    #[serde(rename = "chatDefaults", default)]
    pub chat_defaults: HashMap<String, Vec<ChatMessage>>,
}

/// Mapping from logical prompt key to registry reference.
pub type PromptKeyOptions = HashMap<String, PromptReference>;

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `PROMPT_PROVIDER_CONFIG`: Path to config file
    /// - `LANGFUSE_BASE_URL`, `LANGFUSE_PUBLIC_KEY`, `LANGFUSE_SECRET_KEY`: Registry access
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// A missing default config file is not an error; a missing explicit one is.
    pub fn load() -> AppResult<Self> {
        let explicit = std::env::var("PROMPT_PROVIDER_CONFIG").ok().map(PathBuf::from);
        Self::load_with(explicit.as_deref(), |name| std::env::var(name).ok())
    }

    /// Load configuration from `config_file` (or the default file) and the
    /// given environment lookup.
    pub fn load_with<F>(config_file: Option<&Path>, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        Ok(config.merge_env(env))
    }

    /// Parse a YAML configuration file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut config: AppConfig = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        config.config_file = Some(path.to_path_buf());
        config.registry = config.registry.normalized();
        Ok(config)
    }

    /// Environment variables override file values.
    fn merge_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = env("LANGFUSE_BASE_URL") {
            self.registry.base_url = Some(base_url);
        }

        if let Some(public_key) = env("LANGFUSE_PUBLIC_KEY") {
            self.registry.public_key = Some(public_key);
        }

        if let Some(secret_key) = env("LANGFUSE_SECRET_KEY") {
            self.registry.secret_key = Some(secret_key);
        }

        if let Some(level) = env("RUST_LOG") {
            self.log_level = Some(level);
        }

        if env("NO_COLOR").is_some() {
            self.no_color = true;
        }

        self.registry = self.registry.normalized();
        self
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the file.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(base_url) = base_url {
            self.registry.base_url = Some(base_url);
            self.registry = self.registry.normalized();
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the registry provider and key mapping entries.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.registry.provider.as_str();
        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown registry provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        for (logical_key, reference) in &self.prompt_keys {
            if reference.registry_key.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "Prompt key '{}' maps to a blank registry key",
                    logical_key
                )));
            }
            if reference.version == Some(0) {
                return Err(AppError::Config(format!(
                    "Prompt key '{}' pins version 0; versions start at 1",
                    logical_key
                )));
            }
        }

        Ok(())
    }
}
