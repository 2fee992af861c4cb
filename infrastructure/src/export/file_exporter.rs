//! File summary exporter
//!
//! Writes a finished summary as a markdown file and returns its path
//! as the shareable reference. Negotiation state is already final when
//! export runs, so a failure here only costs the artifact.

use agora_application::ports::export::{ExportError, ExportReference, SummaryExporter};
use agora_domain::NegotiationSummary;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Exports summaries as markdown files in a directory
pub struct FileSummaryExporter {
    dir: PathBuf,
}

impl FileSummaryExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn render(summary: &NegotiationSummary) -> String {
        let mut out = String::from("# Negotiation Summary\n\n");
        out.push_str(&format!("Rounds: {}\n\n", summary.rounds));

        if !summary.participants.is_empty() {
            out.push_str("## Participants\n\n");
            for participant in &summary.participants {
                out.push_str(&format!("- {participant}\n"));
            }
            out.push('\n');
        }

        if !summary.policies.is_empty() {
            out.push_str("## Policies Under Discussion\n\n");
            for policy in &summary.policies {
                out.push_str(&format!("- {policy}\n"));
            }
            out.push('\n');
        }

        out.push_str("## Discussion\n\n");
        out.push_str(&summary.narrative);
        out.push('\n');
        out
    }
}

#[async_trait]
impl SummaryExporter for FileSummaryExporter {
    async fn export(&self, summary: &NegotiationSummary) -> Result<ExportReference, ExportError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ExportError::Failed(e.to_string()))?;

        let filename = format!(
            "summary-{}.md",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        );
        let path = self.dir.join(filename);

        tokio::fs::write(&path, Self::render(summary))
            .await
            .map_err(|e| ExportError::Failed(e.to_string()))?;

        info!("Summary exported to {}", path.display());
        Ok(ExportReference {
            location: path.display().to_string(),
        })
    }
}
