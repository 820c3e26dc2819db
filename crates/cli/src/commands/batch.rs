//! Batch command handler.

use super::print_json;
use anyhow::Context;
use clap::Args;
use prompt_provider::{PromptQuery, PromptResolver};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Resolve a JSON list of queries
///
/// The file holds `[{"promptKey": "...", "version": 2}, {"promptKey": "...", "label": "staging"}]`.
#[derive(Args, Debug)]
pub struct BatchCommand {
    /// JSON file with the queries
    pub file: PathBuf,
}

impl BatchCommand {
    pub async fn execute(
        &self,
        resolver: &PromptResolver,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!("Executing batch command from {:?}", self.file);

        let queries = read_queries(&self.file)?;
        tracing::debug!("Loaded {} queries", queries.len());

        let response = resolver.resolve_batch(&queries, cancel).await?;
        print_json(&response)
    }
}

fn read_queries(path: &Path) -> anyhow::Result<Vec<PromptQuery>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read query file {:?}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse query file {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_queries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"promptKey": "ChatTitle", "version": 2}}, {{"promptKey": "Tone", "label": "staging"}}]"#
        )
        .unwrap();

        let queries = read_queries(file.path()).unwrap();
        assert_eq!(
            queries,
            vec![
                PromptQuery::new("ChatTitle").with_version(2),
                PromptQuery::new("Tone").with_label("staging"),
            ]
        );
    }

    #[test]
    fn test_read_queries_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = read_queries(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse query file"));
    }
}
