//! Prompt resolution with registry-first, local-fallback reads.
//!
//! Reads try the registry once and fall back to local defaults on a miss or
//! on any failure other than cancellation. Writes and listing require the
//! registry and propagate every failure.

use crate::defaults::DefaultPromptsSource;
use crate::keys::{translate, Selector};
use crate::types::{BatchResponse, CreatePromptRequest, PromptQuery, ResolvedPrompt};
use prompt_provider_core::{AppError, AppResult};
use prompt_provider_registry::{
    normalize_labels, CreatePromptVersion, PromptContent, PromptSummary, PromptType,
    RegistryClient,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Resolves logical prompt keys against the registry and local defaults.
///
/// Holds no mutable state; clones share the same collaborators.
#[derive(Clone)]
pub struct PromptResolver {
    registry: Arc<dyn RegistryClient>,
    defaults: Arc<dyn DefaultPromptsSource>,
}

impl PromptResolver {
    pub fn new(registry: Arc<dyn RegistryClient>, defaults: Arc<dyn DefaultPromptsSource>) -> Self {
        Self { registry, defaults }
    }

    /// Resolve a text prompt.
    ///
    /// Returns `Ok(None)` when neither the registry nor the local defaults
    /// have the key. Only invalid input and cancellation are errors.
    ///
    /// # Example
    /// ```no_run
    /// # use prompt_provider::PromptResolver;
    /// # use tokio_util::sync::CancellationToken;
    /// # async fn example(resolver: PromptResolver) -> Result<(), Box<dyn std::error::Error>> {
    /// let cancel = CancellationToken::new();
    /// if let Some(prompt) = resolver.resolve("ChatTitle", None, None, &cancel).await? {
    ///     println!("{} ({})", prompt.text().unwrap_or_default(), prompt.source);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn resolve(
        &self,
        prompt_key: &str,
        version: Option<u32>,
        label: Option<&str>,
        cancel: &CancellationToken,
    ) -> AppResult<Option<ResolvedPrompt>> {
        self.resolve_shaped(prompt_key, version, label, PromptType::Text, cancel)
            .await
    }

    /// Resolve a chat prompt; falls back to the chat defaults table.
    pub async fn resolve_chat(
        &self,
        prompt_key: &str,
        version: Option<u32>,
        label: Option<&str>,
        cancel: &CancellationToken,
    ) -> AppResult<Option<ResolvedPrompt>> {
        self.resolve_shaped(prompt_key, version, label, PromptType::Chat, cancel)
            .await
    }

    async fn resolve_shaped(
        &self,
        prompt_key: &str,
        version: Option<u32>,
        label: Option<&str>,
        shape: PromptType,
        cancel: &CancellationToken,
    ) -> AppResult<Option<ResolvedPrompt>> {
        require_key(prompt_key)?;
        if version == Some(0) {
            return Err(AppError::InvalidArgument(
                "Version must be greater than 0".to_string(),
            ));
        }
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        // Registry lookups use the mapped key; local lookups keep the logical one
        let mappings = self.defaults.key_mappings();
        let registry_key = translate(prompt_key, mappings);
        let selector = Selector::choose(version, label, mappings.get(prompt_key));

        if self.registry.is_configured() {
            tracing::info!(
                logical_key = prompt_key,
                registry_key,
                version = ?selector.version(),
                label = ?selector.label(),
                "Fetching prompt from registry"
            );

            match self
                .registry
                .fetch(registry_key, selector.version(), selector.label(), cancel)
                .await
            {
                Ok(Some(record)) if record.prompt.prompt_type() == shape => {
                    tracing::info!(
                        logical_key = prompt_key,
                        registry_key,
                        version = record.version,
                        source = "registry",
                        "Resolved prompt from registry"
                    );
                    return Ok(Some(ResolvedPrompt::from_registry(prompt_key, record)));
                }
                Ok(Some(record)) => {
                    tracing::warn!(
                        logical_key = prompt_key,
                        registry_key,
                        expected = %shape,
                        actual = %record.prompt.prompt_type(),
                        "Registry prompt has the wrong shape, falling back to local defaults"
                    );
                }
                Ok(None) => {
                    tracing::warn!(
                        logical_key = prompt_key,
                        registry_key,
                        %selector,
                        "Prompt not found in registry, falling back to local defaults"
                    );
                }
                Err(err @ (AppError::Cancelled | AppError::InvalidArgument(_))) => {
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(
                        logical_key = prompt_key,
                        registry_key,
                        error = %err,
                        "Error retrieving prompt from registry, falling back to local defaults"
                    );
                }
            }
        } else {
            tracing::info!(
                logical_key = prompt_key,
                "Registry is not configured, using local defaults"
            );
        }

        // Local tier
        Ok(self.resolve_local(prompt_key, shape))
    }

    /// Look up the local defaults table matching `shape`, by logical key.
    fn resolve_local(&self, prompt_key: &str, shape: PromptType) -> Option<ResolvedPrompt> {
        let content = match shape {
            PromptType::Text => self
                .defaults
                .text_defaults()
                .get(prompt_key)
                .map(|text| PromptContent::Text(text.clone())),
            PromptType::Chat => self
                .defaults
                .chat_defaults()
                .get(prompt_key)
                .map(|messages| PromptContent::Chat(messages.clone())),
        };

        match content {
            Some(content) => {
                tracing::info!(
                    logical_key = prompt_key,
                    source = "local",
                    "Resolved prompt from local defaults"
                );
                Some(ResolvedPrompt::local(prompt_key, content))
            }
            None => {
                tracing::warn!(
                    logical_key = prompt_key,
                    "Prompt not found in local defaults either"
                );
                None
            }
        }
    }

    /// Resolve several text prompts with one optional label.
    ///
    /// Blank and repeated keys are dropped; the result keeps first-occurrence
    /// order and omits keys that miss in both tiers.
    pub async fn resolve_many<S: AsRef<str>>(
        &self,
        prompt_keys: &[S],
        label: Option<&str>,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<ResolvedPrompt>> {
        let mut seen = HashSet::new();
        let keys: Vec<&str> = prompt_keys
            .iter()
            .map(AsRef::as_ref)
            .filter(|key| !key.trim().is_empty())
            .filter(|key| seen.insert(*key))
            .collect();

        if keys.is_empty() {
            return Err(AppError::InvalidArgument(
                "At least one prompt key is required".to_string(),
            ));
        }

        let lookups = keys
            .iter()
            .map(|key| self.resolve(key, None, label, cancel));
        let results = futures::future::join_all(lookups).await;

        // Misses are dropped; errors abort the whole call
        let mut prompts = Vec::with_capacity(results.len());
        for result in results {
            if let Some(prompt) = result? {
                prompts.push(prompt);
            }
        }

        Ok(prompts)
    }

    /// Resolve a batch of queries, each with its own selector.
    ///
    /// Blank keys are dropped. Misses are reported in `not_found`.
    pub async fn resolve_batch(
        &self,
        queries: &[PromptQuery],
        cancel: &CancellationToken,
    ) -> AppResult<BatchResponse> {
        let queries: Vec<&PromptQuery> = queries
            .iter()
            .filter(|q| !q.prompt_key.trim().is_empty())
            .collect();

        if queries.is_empty() {
            return Err(AppError::InvalidArgument(
                "At least one prompt key is required".to_string(),
            ));
        }

        let lookups = queries.iter().map(|q| {
            self.resolve(&q.prompt_key, q.version, q.label.as_deref(), cancel)
        });
        let results = futures::future::join_all(lookups).await;

        let mut response = BatchResponse::default();
        for (query, result) in queries.into_iter().zip(results) {
            match result? {
                Some(prompt) => response.prompts.push(prompt),
                None => response.not_found.push(query.prompt_key.clone()),
            }
        }

        Ok(response)
    }

    /// Create a new prompt version in the registry.
    ///
    /// Never falls back: fails with `RegistryUnavailable` when the registry
    /// is not configured and propagates every registry error.
    pub async fn create(
        &self,
        request: &CreatePromptRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ResolvedPrompt> {
        require_key(&request.prompt_key)?;
        if request.content.is_blank() {
            return Err(AppError::InvalidArgument("Content is required".to_string()));
        }
        self.require_registry("create prompts", &request.prompt_key)?;

        let registry_key = translate(&request.prompt_key, self.defaults.key_mappings());
        tracing::info!(
            logical_key = %request.prompt_key,
            registry_key,
            prompt_type = %request.content.prompt_type(),
            "Creating prompt in registry"
        );

        let mut version = CreatePromptVersion::new(registry_key, request.content.clone())
            .with_labels(request.labels.clone())
            .with_tags(request.tags.clone());
        version.commit_message = request.commit_message.clone();
        version.config = request.config.clone();

        match self.registry.create_version(&version, cancel).await {
            Ok(record) => {
                tracing::info!(
                    logical_key = %request.prompt_key,
                    registry_key,
                    version = record.version,
                    "Created prompt in registry"
                );
                Ok(ResolvedPrompt::from_registry(&request.prompt_key, record))
            }
            Err(err) => {
                tracing::error!(
                    logical_key = %request.prompt_key,
                    registry_key,
                    error = %err,
                    "Failed to create prompt in registry"
                );
                Err(err)
            }
        }
    }

    /// Move labels onto an existing version in the registry.
    ///
    /// A missing name/version pair is an `AppError::NotFound`, never a
    /// local default.
    pub async fn update_labels(
        &self,
        prompt_key: &str,
        version: u32,
        new_labels: &[String],
        cancel: &CancellationToken,
    ) -> AppResult<ResolvedPrompt> {
        require_key(prompt_key)?;
        if version == 0 {
            return Err(AppError::InvalidArgument(
                "Version must be greater than 0".to_string(),
            ));
        }
        let new_labels = normalize_labels(new_labels);
        if new_labels.is_empty() {
            return Err(AppError::InvalidArgument(
                "At least one label is required".to_string(),
            ));
        }
        self.require_registry("update prompts", prompt_key)?;

        let registry_key = translate(prompt_key, self.defaults.key_mappings());
        tracing::info!(
            logical_key = prompt_key,
            registry_key,
            version,
            labels = ?new_labels,
            "Updating prompt labels in registry"
        );

        match self
            .registry
            .update_labels(registry_key, version, &new_labels, cancel)
            .await
        {
            Ok(record) => Ok(ResolvedPrompt::from_registry(prompt_key, record)),
            Err(err) => {
                tracing::error!(
                    logical_key = prompt_key,
                    registry_key,
                    version,
                    error = %err,
                    "Failed to update prompt labels"
                );
                Err(err)
            }
        }
    }

    /// List every prompt in the registry. There is no local fallback.
    pub async fn list_all(&self, cancel: &CancellationToken) -> AppResult<Vec<PromptSummary>> {
        if !self.registry.is_configured() {
            tracing::error!("Cannot list prompts: registry is not configured");
            return Err(AppError::RegistryUnavailable(
                "Registry is not configured. Cannot retrieve prompts list.".to_string(),
            ));
        }

        self.registry.list_all(cancel).await.inspect_err(|err| {
            tracing::error!(error = %err, "Failed to list prompts from registry");
        })
    }

    fn require_registry(&self, action: &str, prompt_key: &str) -> AppResult<()> {
        if self.registry.is_configured() {
            return Ok(());
        }

        tracing::error!(
            logical_key = prompt_key,
            "Cannot {}: registry is not configured",
            action
        );
        Err(AppError::RegistryUnavailable(format!(
            "Registry is not configured. Cannot {}.",
            action
        )))
    }
}

fn require_key(prompt_key: &str) -> AppResult<()> {
    if prompt_key.trim().is_empty() {
        return Err(AppError::InvalidArgument(
            "Prompt key is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::ConfigDefaultPrompts;
    use crate::types::PromptSource;
    use prompt_provider_core::{ChatMessage, PromptReference};
    use prompt_provider_registry::{FetchCall, InMemoryRegistry, PromptRecord};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Registry whose reads hang until cancelled and whose writes record the
    /// labels they receive, then fail.
    #[derive(Default)]
    struct StalledRegistry {
        fetch_started: Notify,
        labels_received: Mutex<Vec<Vec<String>>>,
    }

    impl StalledRegistry {
        fn labels_received(&self) -> Vec<Vec<String>> {
            self.labels_received.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl RegistryClient for StalledRegistry {
        fn provider_name(&self) -> &str {
            "stalled"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn fetch(
            &self,
            _name: &str,
            _version: Option<u32>,
            _label: Option<&str>,
            cancel: &CancellationToken,
        ) -> AppResult<Option<PromptRecord>> {
            self.fetch_started.notify_one();
            cancel.cancelled().await;
            Err(AppError::Cancelled)
        }

        async fn list_all(&self, _cancel: &CancellationToken) -> AppResult<Vec<PromptSummary>> {
            Ok(Vec::new())
        }

        async fn create_version(
            &self,
            request: &CreatePromptVersion,
            _cancel: &CancellationToken,
        ) -> AppResult<PromptRecord> {
            self.labels_received.lock().unwrap().push(request.labels.clone());
            Err(AppError::Transport("write rejected".to_string()))
        }

        async fn update_labels(
            &self,
            name: &str,
            version: u32,
            new_labels: &[String],
            _cancel: &CancellationToken,
        ) -> AppResult<PromptRecord> {
            self.labels_received.lock().unwrap().push(new_labels.to_vec());
            Err(AppError::NotFound(format!("{} v{}", name, version)))
        }
    }

    const LOCAL_TITLE: &str = "Summarize this conversation in 5 words.";

    fn defaults() -> ConfigDefaultPrompts {
        ConfigDefaultPrompts::default()
            .with_mapping("ChatTitle", PromptReference::new("chat.title.generate"))
            .with_text("ChatTitle", LOCAL_TITLE)
            .with_text("FriendlyTone", "Be friendly.")
            .with_chat(
                "Tutor",
                vec![ChatMessage::new("system", "You are a patient tutor.")],
            )
    }

    fn resolver_with(registry: &Arc<InMemoryRegistry>) -> PromptResolver {
        PromptResolver::new(registry.clone(), Arc::new(defaults()))
    }

    fn cancel() -> CancellationToken {
        CancellationToken::new()
    }

    #[tokio::test]
    async fn test_registry_hit() {
        let registry = Arc::new(
            InMemoryRegistry::new().with_prompt("chat.title.generate", "Registry title prompt"),
        );
        let resolver = resolver_with(&registry);

        let prompt = resolver
            .resolve("ChatTitle", None, None, &cancel())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(prompt.source, PromptSource::Registry);
        assert_eq!(prompt.text(), Some("Registry title prompt"));
        assert_eq!(prompt.prompt_key, "ChatTitle");
        assert_eq!(prompt.registry_key.as_deref(), Some("chat.title.generate"));
        assert_eq!(prompt.version, Some(1));
    }

    #[tokio::test]
    async fn test_registry_not_found_falls_back_to_local() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);

        let prompt = resolver
            .resolve("ChatTitle", None, None, &cancel())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(prompt.source, PromptSource::Local);
        assert_eq!(prompt.text(), Some(LOCAL_TITLE));
        assert!(prompt.version.is_none());
        assert_eq!(registry.fetches()[0].name, "chat.title.generate");
    }

    #[tokio::test]
    async fn test_transport_error_falls_back_to_local() {
        let registry = Arc::new(InMemoryRegistry::new().with_prompt("FriendlyTone", "remote"));
        registry.fail_with("connection refused");
        let resolver = resolver_with(&registry);

        let prompt = resolver
            .resolve("FriendlyTone", None, None, &cancel())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(prompt.source, PromptSource::Local);
        assert_eq!(prompt.text(), Some("Be friendly."));
        assert_eq!(registry.calls().fetch, 1);
    }

    #[tokio::test]
    async fn test_unconfigured_registry_is_not_called() {
        let registry = Arc::new(InMemoryRegistry::unconfigured());
        let resolver = resolver_with(&registry);

        let prompt = resolver
            .resolve("FriendlyTone", None, None, &cancel())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(prompt.source, PromptSource::Local);
        assert_eq!(registry.calls().total(), 0);
    }

    #[tokio::test]
    async fn test_total_miss_is_none() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);

        let prompt = resolver
            .resolve("Nowhere", None, None, &cancel())
            .await
            .unwrap();
        assert!(prompt.is_none());
    }

    #[tokio::test]
    async fn test_local_lookup_uses_logical_key() {
        // A local entry under the registry key must not answer for the logical key.
        let source = ConfigDefaultPrompts::default()
            .with_mapping("ChatTitle", PromptReference::new("chat.title.generate"))
            .with_text("chat.title.generate", "wrong table key");
        let resolver =
            PromptResolver::new(Arc::new(InMemoryRegistry::new()), Arc::new(source));

        let prompt = resolver
            .resolve("ChatTitle", None, None, &cancel())
            .await
            .unwrap();
        assert!(prompt.is_none());
    }

    #[tokio::test]
    async fn test_default_label_is_production() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);

        resolver.resolve("k", None, None, &cancel()).await.unwrap();
        resolver.resolve("k", Some(3), None, &cancel()).await.unwrap();

        assert_eq!(
            registry.fetches(),
            vec![
                FetchCall {
                    name: "k".to_string(),
                    version: None,
                    label: Some("production".to_string()),
                },
                FetchCall {
                    name: "k".to_string(),
                    version: Some(3),
                    label: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_pinned_mapping_selector() {
        let registry = Arc::new(InMemoryRegistry::new());
        let source = ConfigDefaultPrompts::default().with_mapping(
            "SystemDefault",
            PromptReference::new("prompts.system.default").with_label("staging"),
        );
        let resolver = PromptResolver::new(registry.clone(), Arc::new(source));

        resolver
            .resolve("SystemDefault", None, None, &cancel())
            .await
            .unwrap();

        let fetch = &registry.fetches()[0];
        assert_eq!(fetch.name, "prompts.system.default");
        assert_eq!(fetch.label.as_deref(), Some("staging"));
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let registry = Arc::new(
            InMemoryRegistry::new().with_prompt("chat.title.generate", "Registry title prompt"),
        );
        let resolver = resolver_with(&registry);

        let first = resolver.resolve("ChatTitle", None, None, &cancel()).await.unwrap();
        let second = resolver.resolve("ChatTitle", None, None, &cancel()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_resolve_chat_uses_chat_defaults() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);

        let prompt = resolver
            .resolve_chat("Tutor", None, None, &cancel())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(prompt.source, PromptSource::Local);
        assert_eq!(prompt.messages().unwrap()[0].content, "You are a patient tutor.");

        // Text lookups never read the chat table.
        let text = resolver.resolve("Tutor", None, None, &cancel()).await.unwrap();
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn test_shape_mismatch_falls_back() {
        let registry = Arc::new(
            InMemoryRegistry::new().with_prompt("Tutor", "a text prompt, not chat"),
        );
        let resolver = resolver_with(&registry);

        let prompt = resolver
            .resolve_chat("Tutor", None, None, &cancel())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(prompt.source, PromptSource::Local);
    }

    #[tokio::test]
    async fn test_resolve_rejects_blank_key() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);

        let result = resolver.resolve("  ", None, None, &cancel()).await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
        assert_eq!(registry.calls().total(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_resolve_does_not_fall_back() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);
        let token = CancellationToken::new();
        token.cancel();

        let result = resolver.resolve("ChatTitle", None, None, &token).await;
        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_during_fetch_does_not_fall_back() {
        let registry = Arc::new(StalledRegistry::default());
        let resolver = PromptResolver::new(registry.clone(), Arc::new(defaults()));
        let token = CancellationToken::new();

        let (result, _) = tokio::join!(resolver.resolve("ChatTitle", None, None, &token), async {
            registry.fetch_started.notified().await;
            token.cancel();
        });

        // ChatTitle has a local default, but cancellation wins.
        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_resolve_many_dedups_and_drops_misses() {
        let registry = Arc::new(InMemoryRegistry::new().with_prompt("a", "prompt a"));
        let resolver = resolver_with(&registry);

        let prompts = resolver
            .resolve_many(&["a", "a", "b"], None, &cancel())
            .await
            .unwrap();

        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].prompt_key, "a");
        assert_eq!(registry.calls().fetch, 2);
    }

    #[tokio::test]
    async fn test_resolve_many_preserves_order() {
        let registry = Arc::new(InMemoryRegistry::new().with_prompt("remote", "from registry"));
        let resolver = resolver_with(&registry);

        let prompts = resolver
            .resolve_many(
                &["FriendlyTone", "", "remote", "ChatTitle", "FriendlyTone"],
                None,
                &cancel(),
            )
            .await
            .unwrap();

        let keys: Vec<&str> = prompts.iter().map(|p| p.prompt_key.as_str()).collect();
        assert_eq!(keys, vec!["FriendlyTone", "remote", "ChatTitle"]);
        assert_eq!(prompts[1].source, PromptSource::Registry);
    }

    #[tokio::test]
    async fn test_resolve_many_rejects_empty_input() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);

        let result = resolver.resolve_many(&[" ", ""], None, &cancel()).await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_resolve_batch_reports_not_found() {
        let registry = Arc::new(
            InMemoryRegistry::new()
                .with_prompt("chat.title.generate", "v1")
                .with_prompt("chat.title.generate", "v2"),
        );
        let resolver = resolver_with(&registry);

        let response = resolver
            .resolve_batch(
                &[
                    PromptQuery::new("ChatTitle").with_version(1),
                    PromptQuery::new("Missing"),
                ],
                &cancel(),
            )
            .await
            .unwrap();

        assert_eq!(response.prompts.len(), 1);
        assert_eq!(response.prompts[0].text(), Some("v1"));
        assert_eq!(response.not_found, vec!["Missing".to_string()]);
    }

    #[tokio::test]
    async fn test_create_translates_key() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);

        let request = CreatePromptRequest::text("ChatTitle", "New title prompt")
            .with_labels(vec!["production".to_string()])
            .with_commit_message("initial");
        let created = resolver.create(&request, &cancel()).await.unwrap();

        assert_eq!(created.source, PromptSource::Registry);
        assert_eq!(created.registry_key.as_deref(), Some("chat.title.generate"));
        assert_eq!(created.version, Some(1));

        let resolved = resolver
            .resolve("ChatTitle", None, None, &cancel())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.text(), Some("New title prompt"));
    }

    #[tokio::test]
    async fn test_create_chat_prompt() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);

        let request = CreatePromptRequest::chat(
            "Tutor",
            vec![ChatMessage::new("system", "Explain with examples.")],
        )
        .with_labels(vec!["production".to_string()]);
        let created = resolver.create(&request, &cancel()).await.unwrap();
        assert_eq!(created.prompt_type, Some(PromptType::Chat));

        let resolved = resolver
            .resolve_chat("Tutor", None, None, &cancel())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.source, PromptSource::Registry);
    }

    #[tokio::test]
    async fn test_create_blank_content_makes_no_calls() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);

        let result = resolver
            .create(&CreatePromptRequest::text("ChatTitle", "   "), &cancel())
            .await;

        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
        assert_eq!(registry.calls().total(), 0);
    }

    #[tokio::test]
    async fn test_create_requires_registry() {
        let registry = Arc::new(InMemoryRegistry::unconfigured());
        let resolver = resolver_with(&registry);

        let result = resolver
            .create(&CreatePromptRequest::text("ChatTitle", "x"), &cancel())
            .await;
        assert!(matches!(result, Err(AppError::RegistryUnavailable(_))));
        assert_eq!(registry.calls().total(), 0);
    }

    #[tokio::test]
    async fn test_create_propagates_transport_error() {
        let registry = Arc::new(InMemoryRegistry::new());
        registry.fail_with("503 Service Unavailable");
        let resolver = resolver_with(&registry);

        let result = resolver
            .create(&CreatePromptRequest::text("ChatTitle", "x"), &cancel())
            .await;
        assert!(matches!(result, Err(AppError::Transport(_))));
    }

    #[tokio::test]
    async fn test_update_labels_not_found_is_error() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);

        let result = resolver
            .update_labels("ChatTitle", 4, &["production".to_string()], &cancel())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_labels_moves_label() {
        let registry = Arc::new(
            InMemoryRegistry::new()
                .with_prompt("chat.title.generate", "v1")
                .with_version(CreatePromptVersion::new("chat.title.generate", "v2")),
        );
        let resolver = resolver_with(&registry);

        let updated = resolver
            .update_labels("ChatTitle", 2, &["production".to_string()], &cancel())
            .await
            .unwrap();
        assert_eq!(updated.version, Some(2));

        let resolved = resolver
            .resolve("ChatTitle", None, None, &cancel())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.text(), Some("v2"));
    }

    #[tokio::test]
    async fn test_update_labels_validation_precedes_calls() {
        let registry = Arc::new(InMemoryRegistry::new());
        let resolver = resolver_with(&registry);

        let zero = resolver
            .update_labels("ChatTitle", 0, &["production".to_string()], &cancel())
            .await;
        assert!(matches!(zero, Err(AppError::InvalidArgument(_))));

        let empty = resolver.update_labels("ChatTitle", 1, &[], &cancel()).await;
        assert!(matches!(empty, Err(AppError::InvalidArgument(_))));

        assert_eq!(registry.calls().total(), 0);
    }

    #[tokio::test]
    async fn test_writes_send_only_non_blank_labels() {
        let registry = Arc::new(StalledRegistry::default());
        let resolver = PromptResolver::new(registry.clone(), Arc::new(defaults()));
        let labels = vec![
            "production".to_string(),
            "  ".to_string(),
            " production ".to_string(),
        ];

        let updated = resolver
            .update_labels("ChatTitle", 2, &labels, &cancel())
            .await;
        assert!(matches!(updated, Err(AppError::NotFound(_))));

        let request = CreatePromptRequest::text("ChatTitle", "x").with_labels(labels);
        let created = resolver.create(&request, &cancel()).await;
        assert!(matches!(created, Err(AppError::Transport(_))));

        assert_eq!(
            registry.labels_received(),
            vec![vec!["production".to_string()], vec!["production".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_update_labels_rejects_only_blank_labels() {
        let registry = Arc::new(StalledRegistry::default());
        let resolver = PromptResolver::new(registry.clone(), Arc::new(defaults()));

        let result = resolver
            .update_labels("ChatTitle", 1, &[" ".to_string(), String::new()], &cancel())
            .await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
        assert!(registry.labels_received().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_requires_registry() {
        let registry = Arc::new(InMemoryRegistry::unconfigured());
        let resolver = resolver_with(&registry);

        let result = resolver.list_all(&cancel()).await;
        assert!(matches!(result, Err(AppError::RegistryUnavailable(_))));
    }

    #[tokio::test]
    async fn test_list_all_propagates_errors() {
        let registry = Arc::new(InMemoryRegistry::new().with_prompt("a", "x"));
        let resolver = resolver_with(&registry);

        assert_eq!(resolver.list_all(&cancel()).await.unwrap().len(), 1);

        registry.fail_with("timeout");
        let result = resolver.list_all(&cancel()).await;
        assert!(matches!(result, Err(AppError::Transport(_))));
    }
}
