//! Negotiation summary
//!
//! A summary is derived once from the frozen transcript of a finished
//! negotiation and never changes afterwards. Long transcripts are cut
//! down deterministically before generation: the opening round is kept
//! for framing, then the most recent entries fill the remaining space,
//! in chronological order.

use crate::negotiation::TranscriptEntry;
use serde::{Deserialize, Serialize};

/// Default cap on transcript entries sent to the generation capability
pub const DEFAULT_EXCERPT_LIMIT: usize = 60;

/// Condensed, read-only record of a finished negotiation (Value Object)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiationSummary {
    /// Persona the summary was generated under
    pub moderator: String,
    /// Narrative produced by the generation capability
    pub narrative: String,
    /// Agents who spoke, in order of first appearance
    pub participants: Vec<String>,
    /// Number of rounds the negotiation ran
    pub rounds: u32,
    /// Titles of the policies under discussion
    pub policies: Vec<String>,
}

impl NegotiationSummary {
    pub fn new(moderator: impl Into<String>, narrative: impl Into<String>) -> Self {
        Self {
            moderator: moderator.into(),
            narrative: narrative.into(),
            participants: Vec::new(),
            rounds: 0,
            policies: Vec::new(),
        }
    }

    pub fn with_participants(mut self, participants: Vec<String>) -> Self {
        self.participants = participants;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_policies(mut self, policies: Vec<String>) -> Self {
        self.policies = policies;
        self
    }
}

/// Cut a transcript down to at most `max_entries` entries.
///
/// Keeps every entry when the transcript fits. Otherwise the excerpt is
/// the whole first round (the framing of the discussion) plus the most
/// recent entries, chronological order preserved. When the first round
/// alone exceeds the cap, its earliest entries win.
pub fn excerpt(entries: &[TranscriptEntry], max_entries: usize) -> Vec<&TranscriptEntry> {
    if entries.len() <= max_entries {
        return entries.iter().collect();
    }

    let first_round = entries.first().map(|e| e.round).unwrap_or(0);
    let mut keep: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.round == first_round)
        .map(|(i, _)| i)
        .take(max_entries)
        .collect();

    let remaining = max_entries - keep.len();
    let mut tail: Vec<usize> = (0..entries.len())
        .rev()
        .filter(|i| !keep.contains(i))
        .take(remaining)
        .collect();
    keep.append(&mut tail);
    keep.sort_unstable();

    keep.into_iter().map(|i| &entries[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;
    use crate::emotion::Emotion;
    use crate::negotiation::{Speaker, Transcript};

    fn transcript(rounds: u32, per_round: usize) -> Transcript {
        let mut transcript = Transcript::new();
        for round in 1..=rounds {
            for i in 0..per_round {
                transcript.append(
                    Speaker::Agent(AgentId::new(format!("agent{i}"))),
                    round,
                    format!("round {round} msg {i}"),
                    Emotion::Neutral,
                    None,
                );
            }
        }
        transcript
    }

    #[test]
    fn test_short_transcript_is_untouched() {
        let transcript = transcript(2, 3);
        let cut = excerpt(transcript.entries(), 10);
        assert_eq!(cut.len(), 6);
    }

    #[test]
    fn test_excerpt_keeps_first_round_and_tail() {
        let transcript = transcript(10, 4); // 40 entries
        let cut = excerpt(transcript.entries(), 12);
        assert_eq!(cut.len(), 12);

        // All of round 1 survives.
        assert_eq!(cut.iter().filter(|e| e.round == 1).count(), 4);
        // The rest comes from the newest rounds.
        assert_eq!(cut.last().unwrap().text, "round 10 msg 3");
        assert!(cut.iter().all(|e| e.round == 1 || e.round >= 9));

        // Chronological order is preserved.
        for pair in cut.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn test_excerpt_oversized_first_round() {
        let transcript = transcript(1, 20);
        let cut = excerpt(transcript.entries(), 5);
        assert_eq!(cut.len(), 5);
        assert_eq!(cut[0].text, "round 1 msg 0");
        assert_eq!(cut[4].text, "round 1 msg 4");
    }

    #[test]
    fn test_excerpt_is_deterministic() {
        let transcript = transcript(6, 4);
        let first: Vec<_> = excerpt(transcript.entries(), 10)
            .iter()
            .map(|e| e.id)
            .collect();
        let second: Vec<_> = excerpt(transcript.entries(), 10)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_builder() {
        let summary = NegotiationSummary::new("PolicyAnalyst", "They argued, then agreed.")
            .with_participants(vec!["dr-chen".to_string()])
            .with_rounds(3)
            .with_policies(vec!["Partial Integration".to_string()]);
        assert_eq!(summary.moderator, "PolicyAnalyst");
        assert_eq!(summary.rounds, 3);
        assert_eq!(summary.participants.len(), 1);
    }
}
