//! Turn-order strategies
//!
//! The state machine enforces transition legality only; which agent
//! speaks next is a pluggable [`TurnPolicy`]. Two strategies ship:
//! strict round-robin and keyword-weighted routing that sends user
//! messages to the most relevant stance. Both are pure functions of
//! their inputs, so a given transcript always yields the same order.

use super::transcript::{Speaker, Transcript};
use crate::agent::{Agent, AgentId};

/// Strategy deciding which roster agent speaks next
pub trait TurnPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Pick the next agent for `round`, or `None` when every roster
    /// agent has already spoken in it.
    fn next_agent(
        &self,
        roster: &[Agent],
        transcript: &Transcript,
        round: u32,
        user_message: Option<&str>,
    ) -> Option<AgentId>;
}

/// Roster order, one turn per agent per round
#[derive(Debug, Default)]
pub struct RoundRobinPolicy;

impl TurnPolicy for RoundRobinPolicy {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn next_agent(
        &self,
        roster: &[Agent],
        transcript: &Transcript,
        round: u32,
        _user_message: Option<&str>,
    ) -> Option<AgentId> {
        roster
            .iter()
            .find(|a| !transcript.agent_spoke_in_round(&a.id, round))
            .map(|a| a.id.clone())
    }
}

/// Content-aware routing: stance-topic keywords and direct mentions in
/// the user's message pull an agent forward, recent speakers are pushed
/// back.
///
/// Scores are deterministic; ties resolve to roster order.
#[derive(Debug, Default)]
pub struct KeywordWeightedPolicy;

impl KeywordWeightedPolicy {
    const BASE_SCORE: f64 = 1.0;
    const RECENT_SPEAKER_PENALTY: f64 = 0.5;
    const LAST_SPEAKER_PENALTY: f64 = 0.3;
    const TOPIC_BOOST: f64 = 1.5;
    const MENTION_BOOST: f64 = 2.0;
    const MIN_SCORE: f64 = 0.1;

    fn score(&self, agent: &Agent, transcript: &Transcript, user_message: Option<&str>) -> f64 {
        let mut score = Self::BASE_SCORE;

        // Whoever spoke recently yields the floor.
        let recent: Vec<&AgentId> = transcript
            .entries()
            .iter()
            .rev()
            .filter_map(|e| e.speaker.as_agent())
            .take(3)
            .collect();

        for speaker in &recent {
            if **speaker == agent.id {
                score -= Self::RECENT_SPEAKER_PENALTY;
            }
        }
        if recent.first() == Some(&&agent.id) {
            score -= Self::LAST_SPEAKER_PENALTY;
        }

        if let Some(message) = user_message {
            let lower = message.to_lowercase();

            if agent
                .stance
                .topic_keywords()
                .iter()
                .any(|kw| lower.contains(kw))
            {
                score += Self::TOPIC_BOOST;
            }

            // A direct mention trumps topic relevance.
            if lower.contains(&agent.name.to_lowercase()) {
                score += Self::MENTION_BOOST;
            }
        }

        score.max(Self::MIN_SCORE)
    }
}

impl TurnPolicy for KeywordWeightedPolicy {
    fn name(&self) -> &'static str {
        "keyword-weighted"
    }

    fn next_agent(
        &self,
        roster: &[Agent],
        transcript: &Transcript,
        round: u32,
        user_message: Option<&str>,
    ) -> Option<AgentId> {
        let mut best: Option<(&Agent, f64)> = None;

        for agent in roster {
            if transcript.agent_spoke_in_round(&agent.id, round) {
                continue;
            }
            let score = self.score(agent, transcript, user_message);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((agent, score)),
            }
        }

        best.map(|(a, _)| a.id.clone())
    }
}
