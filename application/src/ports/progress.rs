//! Progress notification port
//!
//! Defines the interface for reporting progress while a negotiation
//! runs. Implementations live in the presentation layer (console,
//! web UI).

use agora_domain::Agent;

/// Callback for progress updates during a negotiation run
pub trait NegotiationProgress: Send + Sync {
    /// Called when a round opens
    fn on_round_start(&self, round: u32, total_rounds: u32);

    /// Called when an agent takes the floor
    fn on_turn_start(&self, agent: &Agent);

    /// Called when an agent's turn finishes (or finally fails)
    fn on_turn_complete(&self, agent: &Agent, success: bool);

    /// Called when a round closes
    fn on_round_complete(&self, round: u32);

    /// Called when summarization begins
    fn on_summary_start(&self) {}

    /// Called when summarization finishes
    fn on_summary_complete(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl NegotiationProgress for NoProgress {
    fn on_round_start(&self, _round: u32, _total_rounds: u32) {}
    fn on_turn_start(&self, _agent: &Agent) {}
    fn on_turn_complete(&self, _agent: &Agent, _success: bool) {}
    fn on_round_complete(&self, _round: u32) {}
}
