//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod export;
pub mod generation;
pub mod progress;
pub mod reflection;
pub mod transcript_logger;
