//! Prompt registry integration for the prompt provider.
//!
//! This crate provides a backend-agnostic client abstraction for a remote
//! prompt registry: fetch a prompt by name and version or label, list all
//! prompts, create new versions and move labels between versions.
//!
//! # Providers
//! - **Langfuse**: HTTP client for the Langfuse public prompts API
//! - **Memory**: In-process registry for tests and offline development
//!
//! # Example
//! ```no_run
//! use prompt_provider_core::RegistryOptions;
//! use prompt_provider_registry::{RegistryClient, providers::LangfuseClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = RegistryOptions::new("https://cloud.langfuse.com", "pk-lf-...", "sk-lf-...");
//! let client = LangfuseClient::new(&options)?;
//! let cancel = CancellationToken::new();
//! if let Some(record) = client.fetch("chat.title.generate", None, Some("production"), &cancel).await? {
//!     println!("v{}: {:?}", record.version, record.prompt);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::RegistryClient;
pub use factory::create_client;
pub use providers::{InMemoryRegistry, LangfuseClient};
pub use providers::memory::{CallCounts, FetchCall};
pub use types::{
    normalize_labels, CreatePromptVersion, ListMeta, PromptConfig, PromptContent, PromptListPage,
    PromptRecord, PromptSummary, PromptType, UpdateLabelsBody,
};
