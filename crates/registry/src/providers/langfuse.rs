//! Langfuse registry implementation.
//!
//! This module talks to the Langfuse public prompts API.
//! Langfuse API: https://api.reference.langfuse.com/#tag/prompts

use crate::client::RegistryClient;
use crate::types::{
    normalize_labels, CreatePromptVersion, PromptListPage, PromptRecord, PromptSummary,
    UpdateLabelsBody,
};
use prompt_provider_core::{AppError, AppResult, RegistryOptions};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const PROMPTS_PATH: [&str; 4] = ["api", "public", "v2", "prompts"];

/// Resolved address and key pair of a configured registry.
#[derive(Debug, Clone)]
struct Credentials {
    base_url: Url,
    public_key: String,
    secret_key: String,
}

/// Langfuse registry client.
pub struct LangfuseClient {
    /// `None` when the registry is not configured
    credentials: Option<Credentials>,

    /// HTTP client
    http: reqwest::Client,
}

impl LangfuseClient {
    /// Create a client from registry options.
    ///
    /// Missing credentials produce an unconfigured client rather than an
    /// error; a malformed base URL is a configuration error.
    pub fn new(options: &RegistryOptions) -> AppResult<Self> {
        let options = options.clone().normalized();

        let credentials = if options.is_configured() {
            let (Some(base_url), Some(public_key), Some(secret_key)) =
                (options.base_url, options.public_key, options.secret_key)
            else {
                return Err(AppError::Config(
                    "Registry options are incomplete".to_string(),
                ));
            };

            let base_url = Url::parse(&base_url).map_err(|e| {
                AppError::Config(format!("Invalid registry base URL '{}': {}", base_url, e))
            })?;

            Some(Credentials {
                base_url,
                public_key,
                secret_key,
            })
        } else {
            tracing::warn!("Langfuse is not configured; registry operations are unavailable");
            None
        };

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { credentials, http })
    }

    /// Create a client with no credentials.
    pub fn unconfigured() -> Self {
        Self {
            credentials: None,
            http: reqwest::Client::new(),
        }
    }

    fn credentials(&self) -> AppResult<&Credentials> {
        self.credentials.as_ref().ok_or_else(|| {
            AppError::NotConfigured(
                "Langfuse base URL, public key and secret key must be set".to_string(),
            )
        })
    }

    /// Build an endpoint URL below the prompts API, percent-encoding each segment.
    fn endpoint(&self, credentials: &Credentials, extra: &[&str]) -> AppResult<Url> {
        let mut url = credentials.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Config(format!(
                    "Registry base URL cannot be a base: {}",
                    credentials.base_url
                ))
            })?
            .pop_if_empty()
            .extend(PROMPTS_PATH)
            .extend(extra);
        Ok(url)
    }

    fn authorized(&self, credentials: &Credentials, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&credentials.public_key, Some(&credentials.secret_key))
    }

    /// Send a request, aborting when `cancel` fires.
    async fn send(&self, request: RequestBuilder, cancel: &CancellationToken) -> AppResult<Response> {
        cancellable(cancel, async move {
            request
                .send()
                .await
                .map_err(|e| AppError::Transport(format!("Failed to send request to Langfuse: {}", e)))
        })
        .await
    }

    /// Check the status and decode a JSON body.
    async fn decode<T: DeserializeOwned>(
        &self,
        response: Response,
        cancel: &CancellationToken,
    ) -> AppResult<T> {
        cancellable(cancel, async move {
            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(AppError::Transport(format!(
                    "Langfuse API error ({}): {}",
                    status, error_text
                )));
            }

            response
                .json::<T>()
                .await
                .map_err(|e| AppError::Transport(format!("Failed to parse Langfuse response: {}", e)))
        })
        .await
    }
}

/// Race `future` against the cancellation token.
async fn cancellable<T>(
    cancel: &CancellationToken,
    future: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        result = future => result,
    }
}

#[async_trait::async_trait]
impl RegistryClient for LangfuseClient {
    fn provider_name(&self) -> &str {
        "langfuse"
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    async fn fetch(
        &self,
        name: &str,
        version: Option<u32>,
        label: Option<&str>,
        cancel: &CancellationToken,
    ) -> AppResult<Option<PromptRecord>> {
        let credentials = self.credentials()?;
        if name.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "Prompt name is required".to_string(),
            ));
        }

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(version) = version {
            query.push(("version", version.to_string()));
        }
        if let Some(label) = label.filter(|l| !l.trim().is_empty()) {
            query.push(("label", label.to_string()));
        }

        tracing::info!(prompt = name, ?version, ?label, "Fetching prompt from Langfuse");

        let url = self.endpoint(credentials, &[name])?;
        let request = self.authorized(credentials, self.http.get(url).query(&query));
        let response = self.send(request, cancel).await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!(prompt = name, "Prompt not found in Langfuse");
            return Ok(None);
        }

        let record: PromptRecord = self.decode(response, cancel).await?;
        tracing::info!(prompt = name, version = record.version, "Fetched prompt from Langfuse");

        Ok(Some(record))
    }

    async fn list_all(&self, cancel: &CancellationToken) -> AppResult<Vec<PromptSummary>> {
        let credentials = self.credentials()?;

        tracing::info!("Fetching all prompts from Langfuse");

        let url = self.endpoint(credentials, &[])?;
        let request = self.authorized(credentials, self.http.get(url));
        let response = self.send(request, cancel).await?;
        let page: PromptListPage = self.decode(response, cancel).await?;

        match page.data {
            Some(data) => {
                tracing::info!(count = data.len(), "Fetched prompt listing from Langfuse");
                Ok(data)
            }
            None => {
                tracing::warn!("Langfuse prompt listing contained no data");
                Ok(Vec::new())
            }
        }
    }

    async fn create_version(
        &self,
        request: &CreatePromptVersion,
        cancel: &CancellationToken,
    ) -> AppResult<PromptRecord> {
        let credentials = self.credentials()?;
        request.validate()?;

        tracing::info!(prompt = %request.name, prompt_type = %request.prompt_type, "Creating prompt version in Langfuse");

        let body = CreatePromptVersion {
            labels: normalize_labels(&request.labels),
            ..request.clone()
        };
        let url = self.endpoint(credentials, &[])?;
        let http_request = self.authorized(credentials, self.http.post(url).json(&body));
        let response = self.send(http_request, cancel).await?;
        let created: PromptRecord = self.decode(response, cancel).await?;

        tracing::info!(prompt = %created.name, version = created.version, "Created prompt version in Langfuse");

        Ok(created)
    }

    async fn update_labels(
        &self,
        name: &str,
        version: u32,
        new_labels: &[String],
        cancel: &CancellationToken,
    ) -> AppResult<PromptRecord> {
        let credentials = self.credentials()?;
        validate_label_update(name, version, new_labels)?;
        let new_labels = normalize_labels(new_labels);

        tracing::info!(prompt = name, version, labels = ?new_labels, "Updating prompt labels in Langfuse");

        let version_segment = version.to_string();
        let url = self.endpoint(credentials, &[name, "versions", &version_segment])?;
        let body = UpdateLabelsBody { new_labels };
        let request = self.authorized(credentials, self.http.patch(url).json(&body));
        let response = self.send(request, cancel).await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!(prompt = name, version, "Prompt version not found in Langfuse");
            return Err(AppError::NotFound(format!(
                "Prompt '{}' version {} not found",
                name, version
            )));
        }

        let updated: PromptRecord = self.decode(response, cancel).await?;
        tracing::info!(prompt = %updated.name, version = updated.version, "Updated prompt labels in Langfuse");

        Ok(updated)
    }
}

/// Shared argument checks for label updates.
pub(crate) fn validate_label_update(name: &str, version: u32, new_labels: &[String]) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidArgument(
            "Prompt name is required".to_string(),
        ));
    }

    if version == 0 {
        return Err(AppError::InvalidArgument(
            "Version must be greater than 0".to_string(),
        ));
    }

    if new_labels.iter().all(|label| label.trim().is_empty()) {
        return Err(AppError::InvalidArgument(
            "At least one label is required".to_string(),
        ));
    }

    Ok(())
}
