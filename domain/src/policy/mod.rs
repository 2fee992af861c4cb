//! Policy selection model
//!
//! Policy options, the user's running selection and the budget rules
//! that gate (softly) whether a negotiation should proceed.

pub mod catalog;
pub mod entities;
pub mod selection;

pub use catalog::{default_policy_areas, find_option};
pub use entities::{PolicyArea, PolicyImpact, PolicyOption};
pub use selection::{BudgetRules, PolicySelection};
