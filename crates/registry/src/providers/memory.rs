//! In-memory registry for tests and offline development.

use crate::client::RegistryClient;
use crate::providers::langfuse::validate_label_update;
use crate::types::{
    normalize_labels, CreatePromptVersion, PromptContent, PromptRecord, PromptSummary,
};
use prompt_provider_core::{AppError, AppResult, DEFAULT_LABEL};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Label that always points at the newest version.
const LATEST_LABEL: &str = "latest";

/// Number of calls received per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub fetch: usize,
    pub list_all: usize,
    pub create_version: usize,
    pub update_labels: usize,
}

impl CallCounts {
    /// Total calls across all operations.
    pub fn total(&self) -> usize {
        self.fetch + self.list_all + self.create_version + self.update_labels
    }
}

/// Arguments of one `fetch` call, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub name: String,
    pub version: Option<u32>,
    pub label: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    /// Versions per prompt name; index `i` holds version `i + 1`
    prompts: HashMap<String, Vec<PromptRecord>>,
    failure: Option<String>,
    calls: CallCounts,
    fetches: Vec<FetchCall>,
}

/// Registry held entirely in process memory.
///
/// Behaves like the hosted registry: versions are immutable and numbered
/// from 1, a label sits on at most one version of a prompt, and `latest`
/// follows the newest version. Records every call it receives and can be
/// told to fail with a transport error.
#[derive(Debug)]
pub struct InMemoryRegistry {
    configured: bool,
    state: Mutex<State>,
}

impl InMemoryRegistry {
    /// Create an empty, configured registry.
    pub fn new() -> Self {
        Self {
            configured: true,
            state: Mutex::new(State::default()),
        }
    }

    /// Create a registry that reports itself as not configured.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Seed a prompt version labelled `production`.
    pub fn with_prompt(self, name: &str, content: impl Into<PromptContent>) -> Self {
        let request =
            CreatePromptVersion::new(name, content).with_labels(vec![DEFAULT_LABEL.to_string()]);
        self.insert(&request);
        self
    }

    /// Seed a prompt version with explicit labels.
    pub fn with_version(self, request: CreatePromptVersion) -> Self {
        self.insert(&request);
        self
    }

    /// Make every subsequent operation fail with a transport error.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.lock().failure = Some(message.into());
    }

    /// Stop injecting failures.
    pub fn clear_failure(&self) {
        self.lock().failure = None;
    }

    /// Calls received so far.
    pub fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    /// Arguments of every `fetch` call received so far.
    pub fn fetches(&self) -> Vec<FetchCall> {
        self.lock().fetches.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cancellation, configuration and injected failures, in that order.
    fn check(&self, state: &State, cancel: &CancellationToken) -> AppResult<()> {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        if !self.configured {
            return Err(AppError::NotConfigured(
                "In-memory registry is disabled".to_string(),
            ));
        }

        if let Some(message) = &state.failure {
            return Err(AppError::Transport(message.clone()));
        }

        Ok(())
    }

    fn insert(&self, request: &CreatePromptVersion) -> PromptRecord {
        let mut state = self.lock();
        let versions = state.prompts.entry(request.name.clone()).or_default();

        let mut labels = normalize_labels(&request.labels);
        if !labels.iter().any(|l| l == LATEST_LABEL) {
            labels.push(LATEST_LABEL.to_string());
        }

        for existing in versions.iter_mut() {
            existing.labels.retain(|l| !labels.contains(l));
        }

        let record = PromptRecord {
            name: request.name.clone(),
            prompt_type: request.prompt_type,
            prompt: request.prompt.clone(),
            config: request.config.clone(),
            version: versions.len() as u32 + 1,
            labels,
            tags: request.tags.clone(),
            commit_message: request.commit_message.clone(),
        };
        versions.push(record.clone());
        record
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RegistryClient for InMemoryRegistry {
    fn provider_name(&self) -> &str {
        "memory"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn fetch(
        &self,
        name: &str,
        version: Option<u32>,
        label: Option<&str>,
        cancel: &CancellationToken,
    ) -> AppResult<Option<PromptRecord>> {
        let mut state = self.lock();
        state.calls.fetch += 1;
        state.fetches.push(FetchCall {
            name: name.to_string(),
            version,
            label: label.map(str::to_string),
        });
        self.check(&state, cancel)?;

        let Some(versions) = state.prompts.get(name) else {
            return Ok(None);
        };

        // Like the hosted registry, an unselective request means `production`.
        let record = match (version, label) {
            (Some(version), _) => version
                .checked_sub(1)
                .and_then(|index| versions.get(index as usize)),
            (None, Some(label)) => versions.iter().find(|r| r.labels.iter().any(|l| l == label)),
            (None, None) => versions
                .iter()
                .find(|r| r.labels.iter().any(|l| l == DEFAULT_LABEL)),
        };

        Ok(record.cloned())
    }

    async fn list_all(&self, cancel: &CancellationToken) -> AppResult<Vec<PromptSummary>> {
        let mut state = self.lock();
        state.calls.list_all += 1;
        self.check(&state, cancel)?;

        let mut summaries: Vec<PromptSummary> = state
            .prompts
            .values()
            .filter_map(|versions| {
                let newest = versions.last()?;
                let mut labels: Vec<String> = Vec::new();
                for label in versions.iter().flat_map(|r| r.labels.iter()) {
                    if !labels.contains(label) {
                        labels.push(label.clone());
                    }
                }
                Some(PromptSummary {
                    name: newest.name.clone(),
                    prompt_type: newest.prompt_type,
                    tags: newest.tags.clone(),
                    labels,
                    last_updated_at: None,
                    versions: Some(versions.iter().map(|r| r.version).collect()),
                    last_config: newest.config.clone(),
                })
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(summaries)
    }

    async fn create_version(
        &self,
        request: &CreatePromptVersion,
        cancel: &CancellationToken,
    ) -> AppResult<PromptRecord> {
        {
            let mut state = self.lock();
            state.calls.create_version += 1;
            self.check(&state, cancel)?;
        }
        request.validate()?;

        Ok(self.insert(request))
    }

    async fn update_labels(
        &self,
        name: &str,
        version: u32,
        new_labels: &[String],
        cancel: &CancellationToken,
    ) -> AppResult<PromptRecord> {
        let mut state = self.lock();
        state.calls.update_labels += 1;
        self.check(&state, cancel)?;
        validate_label_update(name, version, new_labels)?;

        let not_found = || AppError::NotFound(format!("Prompt '{}' version {} not found", name, version));
        let versions = state.prompts.get_mut(name).ok_or_else(not_found)?;
        let index = version as usize - 1;
        if index >= versions.len() {
            return Err(not_found());
        }

        let labels = normalize_labels(new_labels);

        for (i, record) in versions.iter_mut().enumerate() {
            if i == index {
                for label in &labels {
                    if !record.labels.contains(label) {
                        record.labels.push(label.clone());
                    }
                }
            } else {
                record.labels.retain(|l| !labels.contains(l));
            }
        }

        Ok(versions[index].clone())
    }
}
