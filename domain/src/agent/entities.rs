//! Negotiation agent entities

use super::stance::AgentStance;
use serde::{Deserialize, Serialize};

/// Identifier of a negotiation agent (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        AgentId::new(s)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        AgentId::new(s)
    }
}

/// Persona metadata for voice delivery (Value Object)
///
/// Carried by agents whose utterances are rendered through a
/// text-to-speech collaborator; the engine itself only stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// Base speaking rate multiplier
    pub rate: f32,
    /// Base pitch multiplier
    pub pitch: f32,
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

impl VoiceProfile {
    pub fn new(rate: f32, pitch: f32) -> Self {
        Self { rate, pitch }
    }
}

/// A negotiation participant (Entity)
///
/// Created at process start from the static roster and never mutated
/// during a negotiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub role: String,
    pub age: u32,
    pub stance: AgentStance,
    /// Topics this agent keeps returning to, most important first
    pub concerns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceProfile>,
}

impl Agent {
    pub fn new(
        id: impl Into<AgentId>,
        name: impl Into<String>,
        role: impl Into<String>,
        age: u32,
        stance: AgentStance,
        concerns: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            age,
            stance,
            concerns,
            voice: None,
        }
    }

    pub fn with_voice(mut self, voice: VoiceProfile) -> Self {
        self.voice = Some(voice);
        self
    }

    /// The agent's leading concern, used in prompts
    pub fn primary_concern(&self) -> &str {
        self.concerns
            .first()
            .map(String::as_str)
            .unwrap_or("education")
    }

    /// The four community leaders of the default scenario.
    pub fn default_roster() -> Vec<Agent> {
        vec![
            Agent::new(
                "minister-santos",
                "Minister Santos",
                "Education Minister",
                52,
                AgentStance::Neoliberal,
                vec![
                    "Budget constraints".to_string(),
                    "Educational standards".to_string(),
                    "Efficiency".to_string(),
                ],
            )
            .with_voice(VoiceProfile::new(0.95, 0.9)),
            Agent::new(
                "dr-chen",
                "Dr. Chen",
                "Education Researcher",
                45,
                AgentStance::Progressive,
                vec![
                    "Educational equity".to_string(),
                    "Inclusive practices".to_string(),
                    "Systemic barriers".to_string(),
                ],
            )
            .with_voice(VoiceProfile::new(1.1, 1.05)),
            Agent::new(
                "mayor-okonjo",
                "Mayor Okonjo",
                "City Mayor",
                58,
                AgentStance::Moderate,
                vec![
                    "Community integration".to_string(),
                    "Public perception".to_string(),
                    "Balanced approach".to_string(),
                ],
            )
            .with_voice(VoiceProfile::default()),
            Agent::new(
                "ms-patel",
                "Ms. Patel",
                "Refugee Advocate",
                39,
                AgentStance::Humanitarian,
                vec![
                    "Refugee wellbeing".to_string(),
                    "Trauma-informed approaches".to_string(),
                    "Cultural sensitivity".to_string(),
                ],
            )
            .with_voice(VoiceProfile::new(0.9, 0.95)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_covers_every_stance() {
        let roster = Agent::default_roster();
        assert_eq!(roster.len(), 4);
        for stance in AgentStance::all() {
            assert!(roster.iter().any(|a| a.stance == stance));
        }
    }

    #[test]
    fn test_roster_ids_are_unique() {
        let roster = Agent::default_roster();
        let mut ids: Vec<&str> = roster.iter().map(|a| a.id.as_str()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn test_primary_concern_fallback() {
        let agent = Agent::new("x", "X", "Observer", 30, AgentStance::Moderate, vec![]);
        assert_eq!(agent.primary_concern(), "education");

        let roster = Agent::default_roster();
        assert_eq!(roster[0].primary_concern(), "Budget constraints");
    }
}
