//! Prompt Provider Core Library
//!
//! This crate provides the foundational utilities shared by the prompt provider crates:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management (registry credentials, key mappings, local defaults)
//! - Shared value types (`ChatMessage`, `PromptReference`)

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, PromptKeyOptions, PromptsOptions, RegistryOptions};
pub use error::{AppError, AppResult};
pub use types::{ChatMessage, PromptReference, DEFAULT_LABEL};
