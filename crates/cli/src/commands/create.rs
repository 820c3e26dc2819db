//! Create command handler.
//!
//! Creates a new prompt version in the registry from inline text or a file.

use super::print_json;
use anyhow::{bail, Context};
use clap::Args;
use prompt_provider::{ChatMessage, CreatePromptRequest, PromptConfig, PromptResolver};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Create a new prompt version
#[derive(Args, Debug)]
pub struct CreateCommand {
    /// Logical prompt key
    pub key: String,

    /// Prompt text
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read prompt content from file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Treat the file as a JSON list of chat messages
    #[arg(long, requires = "file")]
    pub chat: bool,

    /// Label for the new version (repeatable)
    #[arg(short, long = "label")]
    pub labels: Vec<String>,

    /// Tag for the prompt (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,

    /// Model recorded in the prompt config
    #[arg(long)]
    pub model: Option<String>,

    /// Temperature recorded in the prompt config
    #[arg(long)]
    pub temperature: Option<f64>,
}

impl CreateCommand {
    pub async fn execute(
        &self,
        resolver: &PromptResolver,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!("Executing create command for '{}'", self.key);

        let request = self.build_request()?;
        let created = resolver.create(&request, cancel).await?;

        print_json(&created)
    }

    fn build_request(&self) -> anyhow::Result<CreatePromptRequest> {
        let mut request = match (&self.text, &self.file) {
            (Some(text), _) => CreatePromptRequest::text(&self.key, text.as_str()),
            (None, Some(path)) if self.chat => {
                CreatePromptRequest::chat(&self.key, read_messages(path)?)
            }
            (None, Some(path)) => CreatePromptRequest::text(&self.key, read_text(path)?),
            (None, None) => bail!("Provide prompt content with --text or --file"),
        };

        request = request
            .with_labels(self.labels.clone())
            .with_tags(self.tags.clone());

        if let Some(message) = &self.message {
            request = request.with_commit_message(message.as_str());
        }

        if self.model.is_some() || self.temperature.is_some() {
            request = request.with_config(PromptConfig {
                model: self.model.clone(),
                temperature: self.temperature,
                ..PromptConfig::default()
            });
        }

        Ok(request)
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read prompt file {:?}", path))
}

fn read_messages(path: &Path) -> anyhow::Result<Vec<ChatMessage>> {
    let contents = read_text(path)?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse chat messages in {:?}", path))
}
