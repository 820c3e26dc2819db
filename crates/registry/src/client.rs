//! Registry client abstraction.
//!
//! This module defines the contract every registry backend implements.

use crate::types::{CreatePromptVersion, PromptRecord, PromptSummary};
use prompt_provider_core::AppResult;
use tokio_util::sync::CancellationToken;

/// Trait for prompt registry backends.
///
/// Every network operation takes a cancellation token and returns
/// `AppError::Cancelled` promptly once it fires. Operations on an
/// unconfigured client fail with `AppError::NotConfigured`.
#[async_trait::async_trait]
pub trait RegistryClient: Send + Sync {
    /// Get the backend name (e.g., "langfuse", "memory").
    fn provider_name(&self) -> &str;

    /// Whether credentials and base address are present.
    ///
    /// This is a capability probe; it performs no I/O.
    fn is_configured(&self) -> bool;

    /// Fetch one prompt version by name, selected by version and/or label.
    ///
    /// No default label is applied here. Returns `Ok(None)` when the
    /// registry reports the prompt absent.
    async fn fetch(
        &self,
        name: &str,
        version: Option<u32>,
        label: Option<&str>,
        cancel: &CancellationToken,
    ) -> AppResult<Option<PromptRecord>>;

    /// List all prompts (first page of the registry listing).
    async fn list_all(&self, cancel: &CancellationToken) -> AppResult<Vec<PromptSummary>>;

    /// Create a new immutable version of a prompt.
    async fn create_version(
        &self,
        request: &CreatePromptVersion,
        cancel: &CancellationToken,
    ) -> AppResult<PromptRecord>;

    /// Replace the labels of an existing version.
    ///
    /// Fails with `AppError::NotFound` when the name/version pair does not exist.
    async fn update_labels(
        &self,
        name: &str,
        version: u32,
        new_labels: &[String],
        cancel: &CancellationToken,
    ) -> AppResult<PromptRecord>;
}
