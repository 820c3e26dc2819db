//! Registry client factory.
//!
//! Creates the registry client named by the configuration.

use crate::client::RegistryClient;
use crate::providers::{InMemoryRegistry, LangfuseClient};
use prompt_provider_core::{AppError, AppResult, RegistryOptions};
use std::sync::Arc;

/// Create a registry client based on the configured provider.
///
/// # Arguments
/// * `options` - Registry options; `provider` selects the backend
///   ("langfuse" or "memory")
///
/// # Errors
/// Returns error if the provider is unknown or the Langfuse base URL is malformed.
/// Missing credentials are not an error: the returned client reports
/// itself as not configured.
pub fn create_client(options: &RegistryOptions) -> AppResult<Arc<dyn RegistryClient>> {
    match options.provider.trim().to_lowercase().as_str() {
        "langfuse" => {
            let client = LangfuseClient::new(options)?;
            Ok(Arc::new(client))
        }
        "memory" => Ok(Arc::new(InMemoryRegistry::new())),
        other => Err(AppError::Config(format!(
            "Unknown registry provider: '{}'. Supported providers: langfuse, memory",
            other
        ))),
    }
}
