//! Infrastructure layer for agora
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, including configuration file loading.

pub mod config;
pub mod export;
pub mod logging;
pub mod providers;
pub mod reflection;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileNegotiationConfig, FileOutputConfig, FileProviderConfig,
};
pub use export::FileSummaryExporter;
pub use logging::JsonlTranscriptLogger;
pub use providers::{GroqConfig, GroqGateway};
pub use reflection::MemoryReflectionStore;
