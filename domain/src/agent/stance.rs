//! Agent stances and sentiment derivation

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed political stances, ordered by openness to inclusive spending
/// (Value Object)
///
/// The stance is set when the agent is created and never changes during
/// a negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentStance {
    /// Prefers low-tier, cost-effective policies
    Neoliberal,
    /// Prefers balanced, broadly supportable packages
    Moderate,
    /// Prefers transformative, equity-centered policies
    Progressive,
    /// Strongly prefers high-tier policies centering refugee wellbeing
    Humanitarian,
}

impl AgentStance {
    pub fn as_str(&self) -> &str {
        match self {
            AgentStance::Neoliberal => "neoliberal",
            AgentStance::Moderate => "moderate",
            AgentStance::Progressive => "progressive",
            AgentStance::Humanitarian => "humanitarian",
        }
    }

    pub fn all() -> [AgentStance; 4] {
        [
            AgentStance::Neoliberal,
            AgentStance::Moderate,
            AgentStance::Progressive,
            AgentStance::Humanitarian,
        ]
    }

    /// Sentiment this stance holds toward a selection with the given
    /// mean tier.
    ///
    /// Thresholds follow the simulation's tuning: neoliberals warm to
    /// cheap packages, progressives and humanitarians to transformative
    /// ones, moderates to the middle band.
    pub fn sentiment_for(&self, mean_tier: f64) -> Sentiment {
        match self {
            AgentStance::Neoliberal => {
                if mean_tier < 2.0 {
                    Sentiment::Positive
                } else if mean_tier > 2.5 {
                    Sentiment::Negative
                } else {
                    Sentiment::Neutral
                }
            }
            AgentStance::Progressive => {
                if mean_tier > 2.5 {
                    Sentiment::Positive
                } else if mean_tier < 1.5 {
                    Sentiment::Negative
                } else {
                    Sentiment::Neutral
                }
            }
            AgentStance::Moderate => {
                if (1.8..=2.2).contains(&mean_tier) {
                    Sentiment::Positive
                } else {
                    Sentiment::Neutral
                }
            }
            AgentStance::Humanitarian => {
                if mean_tier > 2.0 {
                    Sentiment::Positive
                } else {
                    Sentiment::Negative
                }
            }
        }
    }

    /// Topic keywords that draw this stance into a conversation.
    ///
    /// Used by the keyword-weighted turn policy to route user messages
    /// to the most relevant agent.
    pub fn topic_keywords(&self) -> &'static [&'static str] {
        match self {
            AgentStance::Neoliberal => &["economic", "cost", "budget", "fund", "expense", "tax"],
            AgentStance::Progressive => {
                &["right", "justice", "equal", "fair", "access", "inclusion"]
            }
            AgentStance::Moderate => &[
                "balance",
                "compromise",
                "middle",
                "reasonable",
                "practical",
                "realistic",
            ],
            AgentStance::Humanitarian => {
                &["help", "support", "humanitarian", "child", "trauma", "care"]
            }
        }
    }

    /// Policy-area keywords this stance treats as its home turf.
    pub fn concern_keywords(&self) -> &'static [&'static str] {
        match self {
            AgentStance::Neoliberal => &["economic", "cost", "efficiency"],
            AgentStance::Progressive => &["equity", "inclusion", "access"],
            AgentStance::Moderate => &["balance", "integration", "community"],
            AgentStance::Humanitarian => &["wellbeing", "support", "trauma"],
        }
    }
}

impl std::fmt::Display for AgentStance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentStance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neoliberal" => Ok(AgentStance::Neoliberal),
            "moderate" => Ok(AgentStance::Moderate),
            "progressive" => Ok(AgentStance::Progressive),
            "humanitarian" => Ok(AgentStance::Humanitarian),
            other => Err(format!("Unknown stance: {other}")),
        }
    }
}

/// Coarse disposition of an agent toward the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
