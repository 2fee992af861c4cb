//! Generate Turn use case
//!
//! Builds the context payload for one agent utterance, delegates to the
//! generation gateway, and attaches an emotion tag — from the model's
//! reply when it supplies one, from local inference otherwise.
//!
//! This use case never mutates negotiation state: the caller opens the
//! turn, calls here, and records (or abandons) the result. A failure
//! therefore leaves the active-agent slot exactly as it was, which is
//! what makes per-turn retry safe.

use crate::ports::generation::{
    GatewayError, GenerationGateway, GenerationParams, GenerationRequest,
};
use agora_domain::{
    Agent, AgentId, AgentResponse, BudgetRules, EmotionInference, EntryId, NegotiationState,
    PromptTemplate, StanceEmotionMapper, parse_agent_reply,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Transcript entries of conversational context sent with each turn
const DEFAULT_CONTEXT_WINDOW: usize = 5;

/// Errors that can occur while generating one turn
#[derive(Error, Debug)]
pub enum GenerateTurnError {
    /// The requested target entry does not exist in this negotiation
    #[error("Entry {entry} does not exist in this negotiation")]
    UnknownEntry { agent: AgentId, entry: EntryId },

    /// The external capability failed; retry is the caller's decision
    #[error("Generation failed for agent '{agent}' in round {round}: {source}")]
    Generation {
        agent: AgentId,
        round: u32,
        #[source]
        source: GatewayError,
    },

    /// The caller cancelled the pending call
    #[error("Generation cancelled for agent '{agent}' in round {round}")]
    Cancelled { agent: AgentId, round: u32 },
}

/// Use case for generating a single agent utterance
pub struct GenerateTurnUseCase<G: GenerationGateway> {
    gateway: Arc<G>,
    emotions: Arc<dyn EmotionInference>,
    budget: BudgetRules,
    cancellation_token: Option<CancellationToken>,
    context_window: usize,
}

impl<G: GenerationGateway> GenerateTurnUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            emotions: Arc::new(StanceEmotionMapper),
            budget: BudgetRules::default(),
            cancellation_token: None,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    pub fn with_emotions(mut self, emotions: Arc<dyn EmotionInference>) -> Self {
        self.emotions = emotions;
        self
    }

    pub fn with_budget(mut self, budget: BudgetRules) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn with_context_window(mut self, entries: usize) -> Self {
        self.context_window = entries;
        self
    }

    /// Generate an utterance for `agent` against the current state.
    ///
    /// `respond_to` must reference an existing transcript entry; the
    /// generated utterance is then expected to address it specifically.
    pub async fn execute(
        &self,
        agent: &Agent,
        state: &NegotiationState,
        respond_to: Option<EntryId>,
    ) -> Result<AgentResponse, GenerateTurnError> {
        let round = state.round();
        let transcript = state.transcript();

        let target = match respond_to {
            Some(entry) => Some(transcript.get(entry).ok_or(GenerateTurnError::UnknownEntry {
                agent: agent.id.clone(),
                entry,
            })?),
            None => None,
        };

        let selection = state.selection();
        let sentiment = agent.stance.sentiment_for(selection.mean_tier());

        // The most recent slice of history, in order. The target entry
        // is always part of the payload even when it has scrolled out.
        let history: Vec<(String, String)> = transcript
            .last_entries(self.context_window)
            .iter()
            .map(|e| (e.speaker.label().to_string(), e.text.clone()))
            .collect();

        let request = GenerationRequest::new(
            PromptTemplate::negotiation_system(agent, sentiment),
            PromptTemplate::negotiation_prompt(agent, sentiment, selection, &history, target),
            GenerationParams::dialogue(),
        );

        debug!(agent = %agent.id, round, "Requesting agent response");
        let completion = self.generate_cancellable(agent, round, &request).await?;

        let reply = parse_agent_reply(&completion);
        if reply.message.is_empty() {
            return Err(GenerateTurnError::Generation {
                agent: agent.id.clone(),
                round,
                source: GatewayError::MalformedResponse("empty completion".to_string()),
            });
        }

        let emotion = reply.emotion.unwrap_or_else(|| {
            debug!(agent = %agent.id, "No emotion tag in reply, inferring locally");
            self.emotions.infer(
                agent.stance,
                selection,
                selection.is_valid(self.budget.total_units),
                &reply.message,
            )
        });

        info!(agent = %agent.id, round, %emotion, "Agent response generated");

        let mut response = AgentResponse::new(reply.message, emotion);
        if let Some(entry) = respond_to {
            response = response.responding_to(entry);
        }
        Ok(response)
    }

    /// Run the gateway call, racing it against cancellation.
    ///
    /// A cancelled call surfaces as [`GenerateTurnError::Cancelled`];
    /// the caller is expected to reset or retry the open turn.
    async fn generate_cancellable(
        &self,
        agent: &Agent,
        round: u32,
        request: &GenerationRequest,
    ) -> Result<String, GenerateTurnError> {
        let cancelled = || GenerateTurnError::Cancelled {
            agent: agent.id.clone(),
            round,
        };

        let result = match &self.cancellation_token {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(cancelled());
                }
                tokio::select! {
                    _ = token.cancelled() => return Err(cancelled()),
                    result = self.gateway.generate(request) => result,
                }
            }
            None => self.gateway.generate(request).await,
        };

        result.map_err(|source| GenerateTurnError::Generation {
            agent: agent.id.clone(),
            round,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_domain::{Emotion, PolicyImpact, PolicyOption, PolicySelection};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedGateway {
        replies: Mutex<Vec<Result<String, GatewayError>>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn last_request(&self) -> GenerationRequest {
            self.requests.lock().unwrap().last().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationGateway for ScriptedGateway {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies.lock().unwrap().remove(0)
        }
    }

    struct HangingGateway;

    #[async_trait]
    impl GenerationGateway for HangingGateway {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, GatewayError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    fn selection() -> PolicySelection {
        let mut selection = PolicySelection::new();
        selection.select(PolicyOption::new(
            "a2",
            "Partial Integration",
            "Allow refugees to attend local schools with some restrictions.",
            PolicyImpact::ModerateInclusion,
            2,
            "Access to Education",
        ));
        selection.select(PolicyOption::new(
            "l2",
            "Limited Bilingual Support",
            "Provide basic mother tongue support during transition period.",
            PolicyImpact::ModerateInclusion,
            2,
            "Language Instruction",
        ));
        selection
    }

    fn started_state() -> NegotiationState {
        let mut state = NegotiationState::new();
        state.start(selection()).unwrap();
        state
    }

    fn agent() -> Agent {
        Agent::default_roster().remove(0)
    }

    #[tokio::test]
    async fn test_json_reply_carries_model_emotion() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(
            r#"{"message": "A fiscally sound package.", "emotion": "enthusiasm"}"#.to_string(),
        )]));
        let use_case = GenerateTurnUseCase::new(Arc::clone(&gateway));

        let response = use_case.execute(&agent(), &started_state(), None).await.unwrap();
        assert_eq!(response.text, "A fiscally sound package.");
        assert_eq!(response.emotion, Emotion::Enthusiasm);

        // The payload carried the persona and the serialized policies.
        let request = gateway.last_request();
        assert!(request.system.contains("Minister Santos"));
        assert!(request.prompt.contains("Partial Integration (Tier 2, Moderate Inclusion)"));
        assert_eq!(request.params, GenerationParams::dialogue());
    }

    #[tokio::test]
    async fn test_plain_text_reply_falls_back_to_inference() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(
            "I am worried, this is a risk to our budget.".to_string(),
        )]));
        let use_case = GenerateTurnUseCase::new(gateway);

        let response = use_case.execute(&agent(), &started_state(), None).await.unwrap();
        assert_eq!(response.text, "I am worried, this is a risk to our budget.");
        // "risk" keyword drives the local inference.
        assert_eq!(response.emotion, Emotion::Concern);
    }

    #[tokio::test]
    async fn test_gateway_failure_names_agent_and_round() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Err(GatewayError::Timeout)]));
        let use_case = GenerateTurnUseCase::new(gateway);

        let mut state = started_state();
        let speaker = agent();
        state.begin_turn(speaker.id.clone()).unwrap();

        let err = use_case.execute(&speaker, &state, None).await.unwrap_err();
        match err {
            GenerateTurnError::Generation { agent, round, .. } => {
                assert_eq!(agent, speaker.id);
                assert_eq!(round, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // The turn stays open for the caller to retry or reset.
        assert_eq!(state.active_agent(), Some(&speaker.id));
        assert!(state.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_respond_to_is_rejected_before_any_call() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let use_case = GenerateTurnUseCase::new(Arc::clone(&gateway));

        let mut state = started_state();
        let id = state
            .record_user_message("What about costs?", Emotion::Neutral)
            .unwrap();
        // Some unrelated id: shift well past anything recorded.
        let bogus = {
            let mut probe = state.clone();
            for _ in 0..3 {
                probe.record_user_message("x", Emotion::Neutral).unwrap();
            }
            probe.transcript().entries().last().unwrap().id
        };
        assert_ne!(bogus, id);

        let err = use_case
            .execute(&agent(), &state, Some(bogus))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateTurnError::UnknownEntry { .. }));
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_respond_to_target_is_in_payload() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(
            r#"{"message": "On your cost question...", "emotion": "neutral"}"#.to_string(),
        )]));
        let use_case = GenerateTurnUseCase::new(Arc::clone(&gateway));

        let mut state = started_state();
        let entry = state
            .record_user_message("How will we pay for this?", Emotion::Neutral)
            .unwrap();

        let response = use_case
            .execute(&agent(), &state, Some(entry))
            .await
            .unwrap();
        assert_eq!(response.responds_to, Some(entry));

        let request = gateway.last_request();
        assert!(request.prompt.contains("How will we pay for this?"));
        assert!(request.prompt.contains("Respond directly"));
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_pending_call() {
        let token = CancellationToken::new();
        let use_case =
            GenerateTurnUseCase::new(Arc::new(HangingGateway)).with_cancellation(token.clone());

        let state = started_state();
        let speaker = agent();

        let pending = use_case.execute(&speaker, &state, None);
        token.cancel();

        let err = pending.await.unwrap_err();
        assert!(matches!(err, GenerateTurnError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_empty_completion_is_a_failure() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok("   ".to_string())]));
        let use_case = GenerateTurnUseCase::new(gateway);

        let err = use_case
            .execute(&agent(), &started_state(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateTurnError::Generation {
                source: GatewayError::MalformedResponse(_),
                ..
            }
        ));
    }
}
