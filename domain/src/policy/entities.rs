//! Policy domain entities

use serde::{Deserialize, Serialize};

/// Degree of inclusion a policy option represents (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyImpact {
    /// Keeps refugee students outside the mainstream system
    Exclusionary,
    /// Partial access with restrictions
    ModerateInclusion,
    /// Full structural inclusion
    Transformative,
}

impl PolicyImpact {
    pub fn as_str(&self) -> &str {
        match self {
            PolicyImpact::Exclusionary => "Exclusionary",
            PolicyImpact::ModerateInclusion => "Moderate Inclusion",
            PolicyImpact::Transformative => "Transformative",
        }
    }

    /// Weight used by the equity scoring of a finished negotiation.
    pub fn equity_weight(&self) -> u32 {
        match self {
            PolicyImpact::Exclusionary => 1,
            PolicyImpact::ModerateInclusion => 3,
            PolicyImpact::Transformative => 5,
        }
    }
}

impl std::fmt::Display for PolicyImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single selectable policy option (Entity)
///
/// Options are defined once in a catalog and never mutated; the user
/// selects and deselects them but the option itself is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOption {
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: PolicyImpact,
    /// Budget cost in units (1 = basic, 2 = enhanced, 3 = transformative)
    pub tier: u32,
    /// Title of the policy area this option belongs to
    pub area: String,
}

impl PolicyOption {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        impact: PolicyImpact,
        tier: u32,
        area: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            impact,
            tier,
            area: area.into(),
        }
    }
}

/// A themed group of policy options (Entity)
///
/// Each area offers one option per tier; the user picks at most one
/// per area in the UI, but the engine does not enforce that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyArea {
    pub id: String,
    pub title: String,
    pub description: String,
    pub options: Vec<PolicyOption>,
}

impl PolicyArea {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: PolicyOption) -> Self {
        self.options.push(option);
        self
    }

    /// Find an option in this area by id
    pub fn option(&self, id: &str) -> Option<&PolicyOption> {
        self.options.iter().find(|o| o.id == id)
    }
}
