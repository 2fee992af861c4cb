//! Negotiation state machine and transcript
//!
//! The heart of the engine: round tracking, the single active-agent
//! slot, the append-only transcript, and the pluggable turn-order
//! strategies.

pub mod state;
pub mod transcript;
pub mod turn_policy;

pub use state::{AgentResponse, NegotiationError, NegotiationPhase, NegotiationState};
pub use transcript::{EntryId, Speaker, Transcript, TranscriptEntry};
pub use turn_policy::{KeywordWeightedPolicy, RoundRobinPolicy, TurnPolicy};
