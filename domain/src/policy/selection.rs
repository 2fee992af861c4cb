//! Policy selection and budget accounting
//!
//! [`PolicySelection`] is the set of options the user has picked so far.
//! Budget validity is a soft constraint: an over-budget selection is
//! flagged through [`PolicySelection::warnings`] but never blocked, so a
//! negotiation can still start and the agents can react to the overspend.

use super::entities::PolicyOption;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Budget rules in effect for a negotiation (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRules {
    /// Total units available for allocation
    pub total_units: u32,
    /// Advisory threshold for the "nearly exhausted" warning
    pub advisory_threshold: u32,
    /// Whether to warn when all selections sit on a single tier
    pub require_tier_diversity: bool,
}

impl Default for BudgetRules {
    fn default() -> Self {
        Self {
            total_units: 14,
            advisory_threshold: 12,
            require_tier_diversity: true,
        }
    }
}

impl BudgetRules {
    /// Create rules with a custom total; the advisory threshold tracks
    /// two units below the total.
    pub fn new(total_units: u32) -> Self {
        Self {
            total_units,
            advisory_threshold: total_units.saturating_sub(2),
            ..Default::default()
        }
    }

    pub fn without_tier_diversity(mut self) -> Self {
        self.require_tier_diversity = false;
        self
    }
}

/// Insertion-ordered set of selected policy options (Entity)
///
/// Duplicate ids are rejected silently; deselecting an absent id is a
/// no-op. The allocated budget is always recomputed from the current
/// set, never cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySelection {
    options: Vec<PolicyOption>,
}

impl PolicySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option to the selection. Returns `false` (and leaves the
    /// selection unchanged) if an option with the same id is already in.
    pub fn select(&mut self, option: PolicyOption) -> bool {
        if self.contains(&option.id) {
            return false;
        }
        self.options.push(option);
        true
    }

    /// Remove an option by id. Returns `false` if it was not selected.
    pub fn deselect(&mut self, id: &str) -> bool {
        let before = self.options.len();
        self.options.retain(|o| o.id != id);
        self.options.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.options.iter().any(|o| o.id == id)
    }

    /// Selected options in insertion order
    pub fn options(&self) -> &[PolicyOption] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Sum of tiers of the currently selected options.
    ///
    /// Recomputed on every call so it can never drift from the set.
    pub fn allocated_budget(&self) -> u32 {
        self.options.iter().map(|o| o.tier).sum()
    }

    /// Mean tier across the selection (0.0 when empty).
    pub fn mean_tier(&self) -> f64 {
        if self.options.is_empty() {
            return 0.0;
        }
        self.allocated_budget() as f64 / self.options.len() as f64
    }

    /// True when at least two distinct tiers are represented.
    pub fn tier_diversity(&self) -> bool {
        self.options
            .iter()
            .map(|o| o.tier)
            .collect::<HashSet<_>>()
            .len()
            >= 2
    }

    /// A selection is valid while the allocated budget does not exceed
    /// the total. Equality at the boundary is valid.
    pub fn is_valid(&self, total_budget: u32) -> bool {
        self.allocated_budget() <= total_budget
    }

    /// Human-readable advisories for the current selection.
    ///
    /// Guaranteed non-empty when the selection is over budget; may also
    /// carry soft advisories (nearly exhausted, tier diversity) while
    /// the selection is still valid.
    pub fn warnings(&self, rules: &BudgetRules) -> Vec<String> {
        let mut warnings = Vec::new();
        let allocated = self.allocated_budget();

        if allocated > rules.total_units {
            warnings.push(format!(
                "Selections exceed the available budget: {} of {} units allocated",
                allocated, rules.total_units
            ));
        } else if allocated > rules.advisory_threshold {
            warnings.push("Budget nearly exhausted".to_string());
        }

        if rules.require_tier_diversity && self.options.len() >= 2 && !self.tier_diversity() {
            warnings.push("Need diversity in policy tiers".to_string());
        }

        warnings
    }
}
