//! Application layer for agora
//!
//! This crate contains use cases and port definitions. It depends only
//! on the domain layer; adapters for the ports live in infrastructure.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    export::{ExportError, ExportReference, SummaryExporter},
    generation::{GatewayError, GenerationGateway, GenerationParams, GenerationRequest},
    progress::{NegotiationProgress, NoProgress},
    reflection::{ReflectionRecord, ReflectionStore, ReflectionStoreError},
    transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger},
};
pub use use_cases::generate_turn::{GenerateTurnError, GenerateTurnUseCase};
pub use use_cases::run_negotiation::{
    RunNegotiationError, RunNegotiationInput, RunNegotiationUseCase,
};
pub use use_cases::summarize::{SummarizeError, SummarizeUseCase};
