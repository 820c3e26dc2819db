//! Prompt resolution for applications backed by a prompt registry.
//!
//! This crate resolves logical prompt keys with a two-tier fallback:
//! - The remote registry, addressed by a mapped registry key and a version or label
//! - Local defaults from configuration, addressed by the logical key
//!
//! Reads never fail because the registry is down or missing a prompt; they
//! fall back to local defaults and report which tier answered. Writes and
//! listing require the registry.
//!
//! # Example
//! ```no_run
//! use prompt_provider::{ConfigDefaultPrompts, PromptResolver};
//! use prompt_provider_core::AppConfig;
//! use prompt_provider_registry::create_client;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let registry = create_client(&config.registry)?;
//! let defaults = Arc::new(ConfigDefaultPrompts::from_config(&config));
//! let resolver = PromptResolver::new(registry, defaults);
//!
//! let cancel = CancellationToken::new();
//! let prompt = resolver.resolve("ChatTitle", None, None, &cancel).await?;
//! # Ok(())
//! # }
//! ```

pub mod compile;
pub mod defaults;
pub mod keys;
pub mod resolver;
pub mod types;

// Re-export main types
pub use compile::compile;
pub use defaults::{ConfigDefaultPrompts, DefaultPromptsSource};
pub use keys::{translate, Selector};
pub use prompt_provider_core::ChatMessage;
pub use prompt_provider_registry::{PromptConfig, PromptContent, PromptSummary, PromptType};
pub use resolver::PromptResolver;
pub use types::{BatchResponse, CreatePromptRequest, PromptQuery, PromptSource, ResolvedPrompt};
