//! Labels command handler.

use super::print_json;
use clap::Args;
use prompt_provider::PromptResolver;
use tokio_util::sync::CancellationToken;

/// Move labels onto a prompt version
#[derive(Args, Debug)]
pub struct LabelsCommand {
    /// Logical prompt key
    pub key: String,

    /// Version that receives the labels
    pub version: u32,

    /// Labels to set (removed from every other version)
    #[arg(required = true)]
    pub labels: Vec<String>,
}

impl LabelsCommand {
    pub async fn execute(
        &self,
        resolver: &PromptResolver,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!(
            "Executing labels command for '{}' version {}",
            self.key,
            self.version
        );

        let updated = resolver
            .update_labels(&self.key, self.version, &self.labels, cancel)
            .await?;

        print_json(&updated)
    }
}
