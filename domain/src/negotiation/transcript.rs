//! Negotiation transcript
//!
//! Append-only, ordered record of everything said during one
//! negotiation. Ordering is the engine's sole guarantee: entries are
//! non-decreasing in round, and within a round appear in the order
//! their turns were recorded.

use crate::agent::AgentId;
use crate::emotion::Emotion;
use serde::{Deserialize, Serialize};

/// Identifier of a transcript entry, unique within one negotiation
/// (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(u64);

impl EntryId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who produced a transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    /// The human policy advisor
    User,
    /// A roster agent
    Agent(AgentId),
}

impl Speaker {
    pub fn is_user(&self) -> bool {
        matches!(self, Speaker::User)
    }

    pub fn as_agent(&self) -> Option<&AgentId> {
        match self {
            Speaker::Agent(id) => Some(id),
            Speaker::User => None,
        }
    }

    /// Label used in prompts and logs
    pub fn label(&self) -> &str {
        match self {
            Speaker::User => "Policy Advisor",
            Speaker::Agent(id) => id.as_str(),
        }
    }
}

/// One utterance in the negotiation (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub speaker: Speaker,
    pub round: u32,
    pub text: String,
    pub emotion: Emotion,
    /// Entry this utterance specifically addresses, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responds_to: Option<EntryId>,
}

/// The full ordered transcript of one negotiation (Entity)
///
/// Only the negotiation state machine appends to it; everyone else
/// gets read access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&TranscriptEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.get(id).is_some()
    }

    /// The most recent `n` entries, oldest first.
    pub fn last_entries(&self, n: usize) -> &[TranscriptEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Highest round number recorded so far (0 when empty).
    pub fn max_round(&self) -> u32 {
        self.entries.iter().map(|e| e.round).max().unwrap_or(0)
    }

    /// Distinct agent speakers in order of first appearance.
    pub fn agent_speakers(&self) -> Vec<AgentId> {
        let mut speakers = Vec::new();
        for entry in &self.entries {
            if let Speaker::Agent(id) = &entry.speaker
                && !speakers.contains(id)
            {
                speakers.push(id.clone());
            }
        }
        speakers
    }

    /// True when the given agent already spoke in the given round.
    pub fn agent_spoke_in_round(&self, agent: &AgentId, round: u32) -> bool {
        self.entries
            .iter()
            .any(|e| e.round == round && e.speaker.as_agent() == Some(agent))
    }

    pub(crate) fn append(
        &mut self,
        speaker: Speaker,
        round: u32,
        text: impl Into<String>,
        emotion: Emotion,
        responds_to: Option<EntryId>,
    ) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(TranscriptEntry {
            id,
            speaker,
            round,
            text: text.into(),
            emotion,
            responds_to,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str) -> Speaker {
        Speaker::Agent(AgentId::new(id))
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let mut transcript = Transcript::new();
        let first = transcript.append(agent("a"), 1, "one", Emotion::Neutral, None);
        let second = transcript.append(agent("b"), 1, "two", Emotion::Concern, None);
        assert!(first < second);
        assert_eq!(transcript.get(first).unwrap().text, "one");
        assert_eq!(transcript.get(second).unwrap().emotion, Emotion::Concern);
    }

    #[test]
    fn test_last_entries() {
        let mut transcript = Transcript::new();
        for i in 0..6 {
            transcript.append(agent("a"), 1, format!("msg {i}"), Emotion::Neutral, None);
        }
        let tail = transcript.last_entries(5);
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0].text, "msg 1");
        assert_eq!(tail[4].text, "msg 5");

        assert_eq!(transcript.last_entries(100).len(), 6);
    }

    #[test]
    fn test_agent_speakers_in_first_appearance_order() {
        let mut transcript = Transcript::new();
        transcript.append(agent("b"), 1, "x", Emotion::Neutral, None);
        transcript.append(Speaker::User, 1, "y", Emotion::Neutral, None);
        transcript.append(agent("a"), 1, "z", Emotion::Neutral, None);
        transcript.append(agent("b"), 2, "w", Emotion::Neutral, None);

        let speakers = transcript.agent_speakers();
        assert_eq!(speakers, vec![AgentId::new("b"), AgentId::new("a")]);
    }

    #[test]
    fn test_agent_spoke_in_round() {
        let mut transcript = Transcript::new();
        transcript.append(agent("a"), 1, "x", Emotion::Neutral, None);
        assert!(transcript.agent_spoke_in_round(&AgentId::new("a"), 1));
        assert!(!transcript.agent_spoke_in_round(&AgentId::new("a"), 2));
        assert!(!transcript.agent_spoke_in_round(&AgentId::new("b"), 1));
    }
}
