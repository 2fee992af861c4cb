//! Reflection scoring
//!
//! After a negotiation the user answers reflection questions; the
//! engine contributes one derived number, an equity score for the
//! selected package.

use crate::policy::PolicySelection;

/// Equity score of a selection, from 1.0 (fully exclusionary) to 5.0
/// (fully transformative). Mean of the impact weights, rounded to one
/// decimal; 0.0 for an empty selection.
pub fn equity_score(selection: &PolicySelection) -> f64 {
    if selection.is_empty() {
        return 0.0;
    }
    let total: u32 = selection
        .options()
        .iter()
        .map(|o| o.impact.equity_weight())
        .sum();
    let mean = total as f64 / selection.len() as f64;
    (mean * 10.0).round() / 10.0
}
