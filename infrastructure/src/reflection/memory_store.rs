//! In-memory reflection store
//!
//! Process-local adapter for the [`ReflectionStore`] port. Records live
//! for the lifetime of the process; saving again under the same
//! question id layers a new record on top (the latest wins on `get`,
//! older records are kept but unreachable, matching the
//! no-update/no-delete contract).

use agora_application::ports::reflection::{
    ReflectionRecord, ReflectionStore, ReflectionStoreError,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory reflection store
#[derive(Default)]
pub struct MemoryReflectionStore {
    // question id -> records, oldest first
    records: Mutex<HashMap<String, Vec<ReflectionRecord>>>,
    next_id: AtomicU64,
}

impl MemoryReflectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReflectionStore for MemoryReflectionStore {
    async fn save(
        &self,
        question_id: &str,
        text: &str,
    ) -> Result<ReflectionRecord, ReflectionStoreError> {
        let id = format!("refl-{:06}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = ReflectionRecord {
            id,
            question_id: question_id.to_string(),
            text: text.to_string(),
            saved_at: Utc::now(),
        };

        self.records
            .lock()
            .map_err(|_| ReflectionStoreError::Unavailable("store poisoned".to_string()))?
            .entry(question_id.to_string())
            .or_default()
            .push(record.clone());

        Ok(record)
    }

    async fn get(
        &self,
        question_id: &str,
    ) -> Result<Option<ReflectionRecord>, ReflectionStoreError> {
        Ok(self
            .records
            .lock()
            .map_err(|_| ReflectionStoreError::Unavailable("store poisoned".to_string()))?
            .get(question_id)
            .and_then(|records| records.last())
            .cloned())
    }
}
