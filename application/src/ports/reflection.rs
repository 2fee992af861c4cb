//! Reflection store port
//!
//! Key/value semantics for the reflections a user writes after a
//! negotiation. The store attaches a generated id and timestamp on
//! save; records are never updated or deleted. This collaborator sits
//! outside the negotiation engine's own invariants.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur against the reflection store
#[derive(Error, Debug)]
pub enum ReflectionStoreError {
    #[error("Reflection store unavailable: {0}")]
    Unavailable(String),
}

/// A saved reflection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionRecord {
    /// Store-generated identifier
    pub id: String,
    pub question_id: String,
    pub text: String,
    pub saved_at: DateTime<Utc>,
}

/// Port for saving and retrieving reflections
#[async_trait]
pub trait ReflectionStore: Send + Sync {
    /// Persist a reflection for a question, returning the full record.
    async fn save(
        &self,
        question_id: &str,
        text: &str,
    ) -> Result<ReflectionRecord, ReflectionStoreError>;

    /// Fetch the most recent reflection for a question, if any.
    async fn get(
        &self,
        question_id: &str,
    ) -> Result<Option<ReflectionRecord>, ReflectionStoreError>;
}
