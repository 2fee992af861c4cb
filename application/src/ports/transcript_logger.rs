//! Port for structured negotiation logging.
//!
//! Defines the [`TranscriptLogger`] trait for recording negotiation
//! events (start, turns, round boundaries, summary) to a structured
//! log. This is separate from `tracing`-based operation logs: tracing
//! handles human-readable diagnostics, while this port captures the
//! machine-readable record of one negotiation (JSONL).

use serde_json::Value;

/// A structured negotiation event for logging.
#[derive(Debug)]
pub struct TranscriptEvent {
    /// Event type identifier (e.g., "negotiation_started", "turn_recorded")
    pub event_type: &'static str,
    /// JSON payload with event-specific fields
    pub payload: Value,
}

impl TranscriptEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging negotiation events to a structured log.
///
/// The `log` method is intentionally synchronous and non-fallible so
/// logging can never disrupt a negotiation — adapter failures are
/// swallowed by the adapter.
pub trait TranscriptLogger: Send + Sync {
    fn log(&self, event: TranscriptEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoTranscriptLogger;

impl TranscriptLogger for NoTranscriptLogger {
    fn log(&self, _event: TranscriptEvent) {}
}
