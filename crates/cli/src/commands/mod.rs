//! Command handlers for promptctl.
//!
//! Each subcommand lives in its own module; shared wiring is here.

pub mod batch;
pub mod create;
pub mod get;
pub mod labels;
pub mod list;

pub use batch::BatchCommand;
pub use create::CreateCommand;
pub use get::{GetCommand, GetManyCommand};
pub use labels::LabelsCommand;
pub use list::ListCommand;

use prompt_provider::{ConfigDefaultPrompts, PromptResolver};
use prompt_provider_core::{AppConfig, AppResult};
use prompt_provider_registry::create_client;
use serde::Serialize;
use std::sync::Arc;

/// Wire the registry client and local defaults from configuration.
pub fn build_resolver(config: &AppConfig) -> AppResult<PromptResolver> {
    let registry = create_client(&config.registry)?;
    tracing::debug!(
        "Registry '{}' configured: {}",
        registry.provider_name(),
        registry.is_configured()
    );

    let defaults = Arc::new(ConfigDefaultPrompts::from_config(config));
    Ok(PromptResolver::new(registry, defaults))
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
