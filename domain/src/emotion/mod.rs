//! Emotion tags and inference
//!
//! Every agent utterance carries one of a fixed set of emotion tags.
//! The tag normally comes back from the generation capability itself;
//! when it does not, a pluggable [`EmotionInference`] strategy derives
//! one from the agent's stance and the state of the selection.

pub mod inference;

pub use inference::{EmotionInference, StanceEmotionMapper, detect_text_emotion};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed set of emotion tags an utterance can carry (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Anger,
    Compassion,
    Frustration,
    Enthusiasm,
    Concern,
}

impl Emotion {
    pub fn as_str(&self) -> &str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Anger => "anger",
            Emotion::Compassion => "compassion",
            Emotion::Frustration => "frustration",
            Emotion::Enthusiasm => "enthusiasm",
            Emotion::Concern => "concern",
        }
    }

    pub fn all() -> [Emotion; 6] {
        [
            Emotion::Neutral,
            Emotion::Anger,
            Emotion::Compassion,
            Emotion::Frustration,
            Emotion::Enthusiasm,
            Emotion::Concern,
        ]
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neutral" => Ok(Emotion::Neutral),
            "anger" => Ok(Emotion::Anger),
            "compassion" => Ok(Emotion::Compassion),
            "frustration" => Ok(Emotion::Frustration),
            "enthusiasm" => Ok(Emotion::Enthusiasm),
            "concern" => Ok(Emotion::Concern),
            other => Err(format!("Unknown emotion: {other}")),
        }
    }
}
