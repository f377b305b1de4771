use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::VerificationStore;
use crate::error::AppResult;
use crate::models::VerificationRecord;

/// Process-local store. Records do not survive a restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, VerificationRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl VerificationStore for MemoryStore {
    async fn get(&self, identifier: &str) -> AppResult<Option<VerificationRecord>> {
        Ok(self.records.read().await.get(identifier).cloned())
    }

    async fn put(&self, record: &VerificationRecord) -> AppResult<()> {
        self.records
            .write()
            .await
            .insert(record.identifier.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, identifier: &str) -> AppResult<()> {
        self.records.write().await.remove(identifier);
        Ok(())
    }

    async fn purge_expired(&self, now_ms: i64) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.expires_at >= now_ms);
        Ok((before - records.len()) as u64)
    }
}
