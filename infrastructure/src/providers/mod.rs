//! Generation provider adapters

pub mod groq;

pub use groq::{GroqConfig, GroqGateway};
