//! Use cases orchestrating the negotiation engine

pub mod generate_turn;
pub mod run_negotiation;
pub mod summarize;
