//! Run Negotiation use case
//!
//! Drives a whole negotiation: opens rounds, routes turns through a
//! [`TurnPolicy`], generates and records responses, and completes the
//! state machine at the end. Turn order and round count are inputs —
//! the state machine itself only checks transition legality.
//!
//! A failed turn is retried once, then abandoned (the turn is reset and
//! the round moves on); cancellation aborts the run with the state
//! machine left clean.

use crate::ports::generation::GenerationGateway;
use crate::ports::progress::{NegotiationProgress, NoProgress};
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger};
use crate::use_cases::generate_turn::{GenerateTurnError, GenerateTurnUseCase};
use agora_domain::{
    Agent, EntryId, NegotiationError, NegotiationState, PolicySelection, RoundRobinPolicy,
    TurnPolicy, detect_text_emotion,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can abort a negotiation run
#[derive(Error, Debug)]
pub enum RunNegotiationError {
    #[error("No agents in the roster")]
    EmptyRoster,

    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    /// Only cancellation aborts the run; provider failures are retried
    /// and then skipped per turn
    #[error(transparent)]
    Turn(#[from] GenerateTurnError),
}

/// Input for the RunNegotiation use case
#[derive(Debug, Clone)]
pub struct RunNegotiationInput {
    pub selection: PolicySelection,
    pub roster: Vec<Agent>,
    pub rounds: u32,
    /// Scripted advisor messages; message `i` opens round `i + 1`
    pub user_messages: Vec<String>,
}

impl RunNegotiationInput {
    pub fn new(selection: PolicySelection, roster: Vec<Agent>) -> Self {
        Self {
            selection,
            roster,
            rounds: 3,
            user_messages: Vec::new(),
        }
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_user_messages(mut self, messages: Vec<String>) -> Self {
        self.user_messages = messages;
        self
    }
}

/// Use case for running a full negotiation
pub struct RunNegotiationUseCase<G: GenerationGateway + 'static> {
    generator: GenerateTurnUseCase<G>,
    turn_policy: Arc<dyn TurnPolicy>,
    logger: Arc<dyn TranscriptLogger>,
}

impl<G: GenerationGateway + 'static> RunNegotiationUseCase<G> {
    pub fn new(generator: GenerateTurnUseCase<G>) -> Self {
        Self {
            generator,
            turn_policy: Arc::new(RoundRobinPolicy),
            logger: Arc::new(NoTranscriptLogger),
        }
    }

    pub fn with_turn_policy(mut self, policy: Arc<dyn TurnPolicy>) -> Self {
        self.turn_policy = policy;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the run with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunNegotiationInput,
    ) -> Result<NegotiationState, RunNegotiationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the run with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunNegotiationInput,
        progress: &dyn NegotiationProgress,
    ) -> Result<NegotiationState, RunNegotiationError> {
        if input.roster.is_empty() {
            return Err(RunNegotiationError::EmptyRoster);
        }

        let mut state = NegotiationState::new();
        state.start(input.selection.clone())?;

        info!(
            policies = input.selection.len(),
            rounds = input.rounds,
            policy = self.turn_policy.name(),
            "Negotiation started"
        );
        self.logger.log(TranscriptEvent::new(
            "negotiation_started",
            serde_json::json!({
                "policies": input.selection.options().iter().map(|o| o.id.clone()).collect::<Vec<_>>(),
                "allocated_budget": input.selection.allocated_budget(),
                "rounds": input.rounds,
                "turn_policy": self.turn_policy.name(),
            }),
        ));

        for round in 1..=input.rounds {
            progress.on_round_start(round, input.rounds);

            // Agents leave this pool when their turn is abandoned, so
            // the policy cannot hand them the floor again this round.
            let mut eligible: Vec<Agent> = input.roster.clone();

            // The advisor opens the round; the first agent the policy
            // picks responds to that message directly.
            let mut respond_to: Option<EntryId> = None;
            let user_message = input.user_messages.get(round as usize - 1).cloned();
            if let Some(message) = &user_message {
                let emotion = detect_text_emotion(message);
                let entry = state.record_user_message(message.clone(), emotion)?;
                respond_to = Some(entry);
                self.logger.log(TranscriptEvent::new(
                    "user_message",
                    serde_json::json!({
                        "round": round,
                        "entry": entry.value(),
                        "emotion": emotion.as_str(),
                    }),
                ));
            }

            while let Some(agent_id) = self.turn_policy.next_agent(
                &eligible,
                state.transcript(),
                round,
                user_message.as_deref(),
            ) {
                let agent = input
                    .roster
                    .iter()
                    .find(|a| a.id == agent_id)
                    .expect("turn policy returned an agent outside the roster");

                state.begin_turn(agent_id.clone())?;
                progress.on_turn_start(agent);

                match self.take_turn(agent, &state, respond_to.take()).await {
                    Ok(response) => {
                        let emotion = response.emotion;
                        let entry = state.record_response(&agent_id, response)?;
                        progress.on_turn_complete(agent, true);
                        self.logger.log(TranscriptEvent::new(
                            "turn_recorded",
                            serde_json::json!({
                                "round": round,
                                "agent": agent_id.as_str(),
                                "entry": entry.value(),
                                "emotion": emotion.as_str(),
                            }),
                        ));
                    }
                    Err(err @ GenerateTurnError::Cancelled { .. }) => {
                        state.cancel_turn();
                        return Err(err.into());
                    }
                    Err(err) => {
                        warn!(agent = %agent_id, round, "Turn abandoned: {err}");
                        state.cancel_turn();
                        eligible.retain(|a| a.id != agent_id);
                        progress.on_turn_complete(agent, false);
                        self.logger.log(TranscriptEvent::new(
                            "turn_failed",
                            serde_json::json!({
                                "round": round,
                                "agent": agent_id.as_str(),
                                "error": err.to_string(),
                            }),
                        ));
                    }
                }
            }

            progress.on_round_complete(round);
            self.logger.log(TranscriptEvent::new(
                "round_complete",
                serde_json::json!({ "round": round }),
            ));
            if round < input.rounds {
                state.end_round()?;
            }
        }

        state.complete()?;
        info!(
            entries = state.transcript().len(),
            "Negotiation completed"
        );
        self.logger.log(TranscriptEvent::new(
            "negotiation_completed",
            serde_json::json!({ "entries": state.transcript().len() }),
        ));

        Ok(state)
    }

    /// One turn with a single retry on provider failure.
    ///
    /// Cancellation is never retried; the active-agent slot is left for
    /// the caller to reset.
    async fn take_turn(
        &self,
        agent: &Agent,
        state: &NegotiationState,
        respond_to: Option<EntryId>,
    ) -> Result<agora_domain::AgentResponse, GenerateTurnError> {
        match self.generator.execute(agent, state, respond_to).await {
            Ok(response) => Ok(response),
            Err(err @ GenerateTurnError::Cancelled { .. }) => Err(err),
            Err(err) => {
                warn!(agent = %agent.id, "Turn failed, retrying once: {err}");
                self.generator.execute(agent, state, respond_to).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::generation::{GatewayError, GenerationRequest};
    use agora_domain::{KeywordWeightedPolicy, PolicyImpact, PolicyOption, Speaker};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a canned JSON message; optionally fails every call
    /// whose prompt mentions the given marker.
    struct CannedGateway {
        fail_on: Option<String>,
        calls: Mutex<u32>,
    }

    impl CannedGateway {
        fn new() -> Self {
            Self {
                fail_on: None,
                calls: Mutex::new(0),
            }
        }

        fn failing_on(marker: &str) -> Self {
            Self {
                fail_on: Some(marker.to_string()),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerationGateway for CannedGateway {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
            *self.calls.lock().unwrap() += 1;
            if let Some(marker) = &self.fail_on
                && request.system.contains(marker)
            {
                return Err(GatewayError::Timeout);
            }
            Ok(r#"{"message": "I see merit and risk here.", "emotion": "concern"}"#.to_string())
        }
    }

    fn selection() -> PolicySelection {
        let mut selection = PolicySelection::new();
        selection.select(PolicyOption::new(
            "a2",
            "Partial Integration",
            "desc",
            PolicyImpact::ModerateInclusion,
            2,
            "Access to Education",
        ));
        selection
    }

    #[tokio::test]
    async fn test_full_run_records_every_agent_every_round() {
        let generator = GenerateTurnUseCase::new(Arc::new(CannedGateway::new()));
        let use_case = RunNegotiationUseCase::new(generator);

        let input = RunNegotiationInput::new(selection(), Agent::default_roster()).with_rounds(2);
        let state = use_case.execute(input).await.unwrap();

        assert!(state.is_finished());
        // 4 agents x 2 rounds, no user messages.
        assert_eq!(state.transcript().len(), 8);
        assert_eq!(state.transcript().max_round(), 2);

        for pair in state.transcript().entries().windows(2) {
            assert!(pair[0].round <= pair[1].round);
        }
    }

    #[tokio::test]
    async fn test_empty_roster_is_rejected() {
        let generator = GenerateTurnUseCase::new(Arc::new(CannedGateway::new()));
        let use_case = RunNegotiationUseCase::new(generator);

        let input = RunNegotiationInput::new(selection(), Vec::new());
        assert!(matches!(
            use_case.execute(input).await,
            Err(RunNegotiationError::EmptyRoster)
        ));
    }

    #[tokio::test]
    async fn test_empty_selection_is_rejected() {
        let generator = GenerateTurnUseCase::new(Arc::new(CannedGateway::new()));
        let use_case = RunNegotiationUseCase::new(generator);

        let input = RunNegotiationInput::new(PolicySelection::new(), Agent::default_roster());
        assert!(matches!(
            use_case.execute(input).await,
            Err(RunNegotiationError::Negotiation(
                NegotiationError::EmptySelection
            ))
        ));
    }

    #[tokio::test]
    async fn test_user_message_opens_round_and_gets_a_reply() {
        let generator = GenerateTurnUseCase::new(Arc::new(CannedGateway::new()));
        let use_case = RunNegotiationUseCase::new(generator)
            .with_turn_policy(Arc::new(KeywordWeightedPolicy));

        let input = RunNegotiationInput::new(selection(), Agent::default_roster())
            .with_rounds(1)
            .with_user_messages(vec!["How do we fund this budget?".to_string()]);
        let state = use_case.execute(input).await.unwrap();

        let entries = state.transcript().entries();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].speaker, Speaker::User);

        // The budget question routes to the neoliberal minister, who
        // responds to it directly; later turns address nobody specific.
        assert_eq!(entries[1].speaker.label(), "minister-santos");
        assert_eq!(entries[1].responds_to, Some(entries[0].id));
        assert_eq!(entries[2].responds_to, None);
    }

    #[tokio::test]
    async fn test_failing_agent_is_skipped_after_retry() {
        // Dr. Chen's persona is in the system prompt of her calls only.
        let gateway = Arc::new(CannedGateway::failing_on("Dr. Chen"));
        let generator = GenerateTurnUseCase::new(Arc::clone(&gateway));
        let use_case = RunNegotiationUseCase::new(generator);

        let input = RunNegotiationInput::new(selection(), Agent::default_roster()).with_rounds(1);
        let state = use_case.execute(input).await.unwrap();

        assert!(state.is_finished());
        assert_eq!(state.transcript().len(), 3);
        assert!(
            state
                .transcript()
                .entries()
                .iter()
                .all(|e| e.speaker.label() != "dr-chen")
        );
        // 3 successful turns + 2 attempts for the failing agent.
        assert_eq!(*gateway.calls.lock().unwrap(), 5);
    }
}
