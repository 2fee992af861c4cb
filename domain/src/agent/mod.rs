//! Agent roster
//!
//! The fixed set of negotiation participants, each with an immutable
//! stance and persona.

pub mod entities;
pub mod stance;

pub use entities::{Agent, AgentId, VoiceProfile};
pub use stance::{AgentStance, Sentiment};
