//! Get command handlers.
//!
//! Resolve prompts through the registry with local fallback.

use super::print_json;
use anyhow::bail;
use clap::Args;
use prompt_provider::PromptResolver;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// Resolve one prompt
#[derive(Args, Debug)]
pub struct GetCommand {
    /// Logical prompt key
    pub key: String,

    /// Registry version to fetch (takes precedence over --label)
    #[arg(long)]
    pub version: Option<u32>,

    /// Registry label to fetch (default: production)
    #[arg(short, long)]
    pub label: Option<String>,

    /// Resolve a chat prompt instead of a text prompt
    #[arg(long)]
    pub chat: bool,

    /// Template variable used to compile the prompt (name=value)
    #[arg(long = "var", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

impl GetCommand {
    pub async fn execute(
        &self,
        resolver: &PromptResolver,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!("Executing get command for '{}'", self.key);

        let label = self.label.as_deref();
        let resolved = if self.chat {
            resolver
                .resolve_chat(&self.key, self.version, label, cancel)
                .await?
        } else {
            resolver.resolve(&self.key, self.version, label, cancel).await?
        };

        let Some(mut prompt) = resolved else {
            bail!("Prompt '{}' not found in the registry or local defaults", self.key);
        };

        if !self.vars.is_empty() {
            let variables: HashMap<String, String> = self.vars.iter().cloned().collect();
            prompt.content = prompt.compile(&variables)?;
        }

        print_json(&prompt)
    }
}

/// Resolve several prompts with one label
#[derive(Args, Debug)]
pub struct GetManyCommand {
    /// Logical prompt keys
    #[arg(required = true)]
    pub keys: Vec<String>,

    /// Registry label to fetch (default: production)
    #[arg(short, long)]
    pub label: Option<String>,
}

impl GetManyCommand {
    pub async fn execute(
        &self,
        resolver: &PromptResolver,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!("Executing get-many command for {} keys", self.keys.len());

        let prompts = resolver
            .resolve_many(&self.keys, self.label.as_deref(), cancel)
            .await?;

        print_json(&prompts)
    }
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid variable '{}', expected name=value", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var() {
        assert_eq!(
            parse_var("topic=Rust ownership").unwrap(),
            ("topic".to_string(), "Rust ownership".to_string())
        );
        assert_eq!(
            parse_var("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
        assert!(parse_var("novalue").is_err());
        assert!(parse_var("=x").is_err());
    }
}
