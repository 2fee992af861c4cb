//! Negotiation state machine
//!
//! [`NegotiationState`] owns the round counter, the single active-agent
//! slot, the transcript and the completion flag. It enforces the
//! legality of transitions only; which agent speaks next and how many
//! rounds occur are the caller's decisions (see
//! [`turn_policy`](super::turn_policy)).

use super::transcript::{EntryId, Speaker, Transcript};
use crate::agent::AgentId;
use crate::emotion::Emotion;
use crate::policy::PolicySelection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State machine contract violations
#[derive(Error, Debug, PartialEq)]
pub enum NegotiationError {
    /// A negotiation needs at least one selected policy to start
    #[error("Cannot start a negotiation with an empty selection")]
    EmptySelection,

    #[error("Invalid transition: {0}")]
    InvalidTransition(&'static str),

    /// A response arrived for an agent that is not (or no longer) the
    /// active one, e.g. a late reply after a cancelled turn
    #[error("Response from '{got}' does not match the active agent")]
    StaleAgent {
        expected: Option<AgentId>,
        got: AgentId,
    },

    #[error("Negotiation is already complete")]
    AlreadyComplete,
}

/// Observable phase of a negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationPhase {
    NotStarted,
    /// A round is open and no agent turn is in flight
    RoundActive,
    /// An agent turn is in flight
    AwaitingAgent,
    Finished,
}

/// An agent's generated utterance, ready to be recorded (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub text: String,
    pub emotion: Emotion,
    /// Transcript entry this response addresses, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responds_to: Option<EntryId>,
}

impl AgentResponse {
    pub fn new(text: impl Into<String>, emotion: Emotion) -> Self {
        Self {
            text: text.into(),
            emotion,
            responds_to: None,
        }
    }

    pub fn responding_to(mut self, entry: EntryId) -> Self {
        self.responds_to = Some(entry);
        self
    }
}

/// One negotiation in progress (Entity)
///
/// Owned by the calling session; never a global. Multiple instances are
/// fully independent. Invariants: the transcript is append-only, the
/// round never decreases, and at most one agent is active at any
/// instant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NegotiationState {
    selection: PolicySelection,
    round: u32,
    active_agent: Option<AgentId>,
    transcript: Transcript,
    started: bool,
    finished: bool,
}

impl NegotiationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the negotiation with the given selection at round 1.
    pub fn start(&mut self, selection: PolicySelection) -> Result<(), NegotiationError> {
        if self.finished {
            return Err(NegotiationError::AlreadyComplete);
        }
        if self.started {
            return Err(NegotiationError::InvalidTransition(
                "negotiation has already started",
            ));
        }
        if selection.is_empty() {
            return Err(NegotiationError::EmptySelection);
        }

        self.selection = selection;
        self.round = 1;
        self.started = true;
        Ok(())
    }

    pub fn phase(&self) -> NegotiationPhase {
        if self.finished {
            NegotiationPhase::Finished
        } else if !self.started {
            NegotiationPhase::NotStarted
        } else if self.active_agent.is_some() {
            NegotiationPhase::AwaitingAgent
        } else {
            NegotiationPhase::RoundActive
        }
    }

    pub fn selection(&self) -> &PolicySelection {
        &self.selection
    }

    /// Current round; 0 until the negotiation starts
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn active_agent(&self) -> Option<&AgentId> {
        self.active_agent.as_ref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Open a turn for the given agent.
    pub fn begin_turn(&mut self, agent: AgentId) -> Result<(), NegotiationError> {
        self.check_open()?;
        if self.active_agent.is_some() {
            return Err(NegotiationError::InvalidTransition(
                "a turn is already in progress",
            ));
        }
        self.active_agent = Some(agent);
        Ok(())
    }

    /// Record a generated response for the active agent and close the
    /// turn. The entry id of the appended utterance is returned.
    pub fn record_response(
        &mut self,
        agent: &AgentId,
        response: AgentResponse,
    ) -> Result<EntryId, NegotiationError> {
        self.check_open()?;
        if self.active_agent.as_ref() != Some(agent) {
            return Err(NegotiationError::StaleAgent {
                expected: self.active_agent.clone(),
                got: agent.clone(),
            });
        }

        let id = self.transcript.append(
            Speaker::Agent(agent.clone()),
            self.round,
            response.text,
            response.emotion,
            response.responds_to,
        );
        self.active_agent = None;
        Ok(id)
    }

    /// Record a message from the human policy advisor.
    ///
    /// Only legal while no agent turn is in flight: user input between
    /// turns is what the turn policies route on.
    pub fn record_user_message(
        &mut self,
        text: impl Into<String>,
        emotion: Emotion,
    ) -> Result<EntryId, NegotiationError> {
        self.check_open()?;
        if self.active_agent.is_some() {
            return Err(NegotiationError::InvalidTransition(
                "an agent turn is in progress",
            ));
        }
        Ok(self
            .transcript
            .append(Speaker::User, self.round, text, emotion, None))
    }

    /// Abandon an in-flight turn (generation failed or was cancelled).
    ///
    /// Clears the active-agent slot so a later [`begin_turn`] is legal;
    /// already-recorded entries are untouched. Returns the agent whose
    /// turn was abandoned, if any.
    ///
    /// [`begin_turn`]: Self::begin_turn
    pub fn cancel_turn(&mut self) -> Option<AgentId> {
        self.active_agent.take()
    }

    /// Close the current round and open the next one.
    pub fn end_round(&mut self) -> Result<(), NegotiationError> {
        self.check_open()?;
        if self.active_agent.is_some() {
            return Err(NegotiationError::InvalidTransition(
                "cannot end a round while a turn is in progress",
            ));
        }
        self.round += 1;
        Ok(())
    }

    /// Mark the negotiation as finished. Terminal: every later mutation
    /// fails with [`NegotiationError::AlreadyComplete`].
    pub fn complete(&mut self) -> Result<(), NegotiationError> {
        if self.finished {
            return Err(NegotiationError::AlreadyComplete);
        }
        self.finished = true;
        self.active_agent = None;
        Ok(())
    }

    fn check_open(&self) -> Result<(), NegotiationError> {
        if self.finished {
            return Err(NegotiationError::AlreadyComplete);
        }
        if !self.started {
            return Err(NegotiationError::InvalidTransition(
                "negotiation has not started",
            ));
        }
        Ok(())
    }
}
