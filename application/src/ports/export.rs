//! Summary export port
//!
//! Hands a finished summary to a delivery collaborator (file, email,
//! share link). Negotiation state is already final when this runs, so
//! export failures never affect engine correctness.

use agora_domain::NegotiationSummary;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while exporting a summary
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Export failed: {0}")]
    Failed(String),
}

/// Shareable reference to an exported summary
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReference {
    /// Where the summary landed (path, URL, message id)
    pub location: String,
}

/// Port for delivering a finished summary
#[async_trait]
pub trait SummaryExporter: Send + Sync {
    async fn export(&self, summary: &NegotiationSummary) -> Result<ExportReference, ExportError>;
}
