//! Emotion inference strategies
//!
//! When the generation capability does not supply an emotion tag, one is
//! derived locally. The strategy is a trait so tests can pin it and the
//! heuristic can evolve without touching the response pipeline.

use super::Emotion;
use crate::agent::AgentStance;
use crate::policy::PolicySelection;

/// Strategy for deriving an emotion tag for an utterance
pub trait EmotionInference: Send + Sync {
    /// Derive an emotion from the speaker's stance, the selection under
    /// discussion, its budget validity, and the utterance text.
    fn infer(
        &self,
        stance: AgentStance,
        selection: &PolicySelection,
        selection_valid: bool,
        text: &str,
    ) -> Emotion;
}

/// Default heuristic: text keywords first, then the stance/lead-policy
/// table, with a budget-overrun overlay.
#[derive(Debug, Default)]
pub struct StanceEmotionMapper;

impl EmotionInference for StanceEmotionMapper {
    fn infer(
        &self,
        stance: AgentStance,
        selection: &PolicySelection,
        selection_valid: bool,
        text: &str,
    ) -> Emotion {
        // A clear emotional cue in the text wins over the policy table.
        let from_text = detect_text_emotion(text);
        if from_text != Emotion::Neutral {
            return from_text;
        }

        // An overspent package reads as fiscal alarm to the resistant
        // stance and as worry to everyone else.
        if !selection_valid {
            return match stance {
                AgentStance::Neoliberal => Emotion::Frustration,
                _ => Emotion::Concern,
            };
        }

        match selection.options().first() {
            Some(lead) => map_policy_emotion(stance, lead.tier, &lead.area),
            None => Emotion::Neutral,
        }
    }
}

/// Keyword-based emotion detection for free text.
///
/// Returns [`Emotion::Neutral`] when no keyword matches; callers that
/// need a stronger signal fall back to the stance table.
pub fn detect_text_emotion(text: &str) -> Emotion {
    let lower = text.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if contains_any(&["angry", "upset", "unfair", "ridiculous"]) {
        Emotion::Anger
    } else if contains_any(&["worried", "concern", "afraid", "risk"]) {
        Emotion::Concern
    } else if contains_any(&["happy", "excited", "great", "excellent"]) {
        Emotion::Enthusiasm
    } else if contains_any(&["sad", "disappointed", "unfortunate"]) {
        Emotion::Frustration
    } else if contains_any(&["help", "support", "care", "understand"]) {
        Emotion::Compassion
    } else {
        Emotion::Neutral
    }
}

/// Stance x lead-policy emotion table.
///
/// Tier 1 options please the resistant stance and upset the supportive
/// ones; tier 3 the reverse. A policy area that touches the stance's
/// core concerns amplifies the reaction.
fn map_policy_emotion(stance: AgentStance, tier: u32, area: &str) -> Emotion {
    let concern_area = is_area_of_concern(stance, area);

    match stance {
        AgentStance::Neoliberal => match tier {
            1 => {
                if concern_area {
                    Emotion::Enthusiasm
                } else {
                    Emotion::Neutral
                }
            }
            3 => {
                if concern_area {
                    Emotion::Frustration
                } else {
                    Emotion::Concern
                }
            }
            _ => Emotion::Neutral,
        },
        AgentStance::Progressive => match tier {
            3 => {
                if concern_area {
                    Emotion::Enthusiasm
                } else {
                    Emotion::Neutral
                }
            }
            1 => {
                if concern_area {
                    Emotion::Frustration
                } else {
                    Emotion::Concern
                }
            }
            _ => Emotion::Neutral,
        },
        AgentStance::Moderate => match tier {
            2 => Emotion::Neutral,
            _ => {
                if concern_area {
                    Emotion::Concern
                } else {
                    Emotion::Neutral
                }
            }
        },
        AgentStance::Humanitarian => match tier {
            3 => {
                if concern_area {
                    Emotion::Enthusiasm
                } else {
                    Emotion::Compassion
                }
            }
            1 => {
                if concern_area {
                    Emotion::Anger
                } else {
                    Emotion::Frustration
                }
            }
            _ => Emotion::Concern,
        },
    }
}

fn is_area_of_concern(stance: AgentStance, area: &str) -> bool {
    let lower = area.to_lowercase();
    stance
        .concern_keywords()
        .iter()
        .any(|kw| lower.contains(kw))
}
