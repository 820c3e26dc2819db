//! List command handler.

use super::print_json;
use clap::Args;
use prompt_provider::PromptResolver;
use tokio_util::sync::CancellationToken;

/// List every prompt in the registry
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Print only prompt names
    #[arg(long)]
    pub names: bool,
}

impl ListCommand {
    pub async fn execute(
        &self,
        resolver: &PromptResolver,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!("Executing list command");

        let prompts = resolver.list_all(cancel).await?;
        tracing::debug!("Registry returned {} prompts", prompts.len());

        if self.names {
            let names: Vec<&str> = prompts.iter().map(|p| p.name.as_str()).collect();
            return print_json(&names);
        }

        print_json(&prompts)
    }
}
