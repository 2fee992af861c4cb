//! Summarize use case
//!
//! Folds the frozen transcript of a finished negotiation into a
//! [`NegotiationSummary`]. Read-only with respect to the negotiation:
//! invoking it any number of times leaves the transcript untouched,
//! though the generated narrative may differ between calls since
//! generation is external.

use crate::ports::generation::{
    GatewayError, GenerationGateway, GenerationParams, GenerationRequest,
};
use agora_domain::{DEFAULT_EXCERPT_LIMIT, NegotiationState, NegotiationSummary, PromptTemplate, excerpt};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Persona the summary is generated under
const MODERATOR: &str = "PolicyAnalyst";

/// Errors that can occur during summarization
#[derive(Error, Debug)]
pub enum SummarizeError {
    /// The negotiation has not been completed yet
    #[error("Cannot summarize: the negotiation is not finished")]
    IncompleteNegotiation,

    /// The external capability failed; no fallback summary is fabricated
    #[error("Summary generation failed: {source}")]
    Generation {
        #[source]
        source: GatewayError,
    },
}

/// Use case for condensing a finished negotiation
pub struct SummarizeUseCase<G: GenerationGateway> {
    gateway: Arc<G>,
    excerpt_limit: usize,
}

impl<G: GenerationGateway> SummarizeUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            excerpt_limit: DEFAULT_EXCERPT_LIMIT,
        }
    }

    /// Cap the number of transcript entries sent to the capability.
    /// Longer transcripts keep the opening round plus the newest
    /// entries (see [`excerpt`]).
    pub fn with_excerpt_limit(mut self, limit: usize) -> Self {
        self.excerpt_limit = limit;
        self
    }

    pub async fn execute(
        &self,
        state: &NegotiationState,
    ) -> Result<NegotiationSummary, SummarizeError> {
        if !state.is_finished() {
            return Err(SummarizeError::IncompleteNegotiation);
        }

        let transcript = state.transcript();
        let entries = excerpt(transcript.entries(), self.excerpt_limit);
        if entries.len() < transcript.len() {
            debug!(
                kept = entries.len(),
                total = transcript.len(),
                "Transcript excerpted for summarization"
            );
        }

        let lines: Vec<(String, String)> = entries
            .iter()
            .map(|e| (e.speaker.label().to_string(), e.text.clone()))
            .collect();

        let request = GenerationRequest::new(
            PromptTemplate::summary_system(),
            PromptTemplate::summary_prompt(&lines),
            GenerationParams::summary(),
        );

        let narrative = self
            .gateway
            .generate(&request)
            .await
            .map_err(|source| SummarizeError::Generation { source })?;

        info!(
            rounds = transcript.max_round(),
            entries = transcript.len(),
            "Negotiation summarized"
        );

        Ok(NegotiationSummary::new(MODERATOR, narrative)
            .with_participants(
                transcript
                    .agent_speakers()
                    .iter()
                    .map(|a| a.to_string())
                    .collect(),
            )
            .with_rounds(transcript.max_round())
            .with_policies(
                state
                    .selection()
                    .options()
                    .iter()
                    .map(|o| o.title.clone())
                    .collect(),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_domain::{
        AgentId, AgentResponse, Emotion, PolicyImpact, PolicyOption, PolicySelection,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGateway {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingGateway {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl GenerationGateway for CountingGateway {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(request.prompt.contains("TRANSCRIPT:"));
            if self.fail {
                Err(GatewayError::Provider {
                    status: 500,
                    message: "boom".to_string(),
                })
            } else {
                Ok("They argued about tiers, then found common ground.".to_string())
            }
        }
    }

    fn finished_state() -> NegotiationState {
        let mut selection = PolicySelection::new();
        selection.select(PolicyOption::new(
            "a2",
            "Partial Integration",
            "desc",
            PolicyImpact::ModerateInclusion,
            2,
            "Access to Education",
        ));

        let mut state = NegotiationState::new();
        state.start(selection).unwrap();
        for round in 0..2 {
            for id in ["dr-chen", "ms-patel"] {
                let agent = AgentId::new(id);
                state.begin_turn(agent.clone()).unwrap();
                state
                    .record_response(
                        &agent,
                        AgentResponse::new(format!("{id} round {round}"), Emotion::Neutral),
                    )
                    .unwrap();
            }
            state.end_round().unwrap();
        }
        state.complete().unwrap();
        state
    }

    #[tokio::test]
    async fn test_summarize_requires_finished_negotiation() {
        let gateway = Arc::new(CountingGateway::ok());
        let use_case = SummarizeUseCase::new(Arc::clone(&gateway));

        let mut state = NegotiationState::new();
        let mut selection = PolicySelection::new();
        selection.select(PolicyOption::new(
            "a1",
            "T",
            "D",
            PolicyImpact::Exclusionary,
            1,
            "Access to Education",
        ));
        state.start(selection).unwrap();

        let err = use_case.execute(&state).await.unwrap_err();
        assert!(matches!(err, SummarizeError::IncompleteNegotiation));
        // The capability was never contacted.
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_summarize_builds_structured_summary() {
        let gateway = Arc::new(CountingGateway::ok());
        let use_case = SummarizeUseCase::new(gateway);

        let state = finished_state();
        let summary = use_case.execute(&state).await.unwrap();

        assert_eq!(summary.moderator, "PolicyAnalyst");
        assert!(summary.narrative.contains("common ground"));
        assert_eq!(
            summary.participants,
            vec!["dr-chen".to_string(), "ms-patel".to_string()]
        );
        assert_eq!(summary.rounds, 2);
        assert_eq!(summary.policies, vec!["Partial Integration".to_string()]);
    }

    #[tokio::test]
    async fn test_summarize_is_repeatable_without_side_effects() {
        let gateway = Arc::new(CountingGateway::ok());
        let use_case = SummarizeUseCase::new(Arc::clone(&gateway));

        let state = finished_state();
        let before = state.transcript().len();

        use_case.execute(&state).await.unwrap();
        use_case.execute(&state).await.unwrap();

        assert_eq!(state.transcript().len(), before);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_summarize_surfaces_generation_failure() {
        let gateway = Arc::new(CountingGateway::failing());
        let use_case = SummarizeUseCase::new(gateway);

        let err = use_case.execute(&finished_state()).await.unwrap_err();
        assert!(matches!(
            err,
            SummarizeError::Generation {
                source: GatewayError::Provider { status: 500, .. }
            }
        ));
    }
}
