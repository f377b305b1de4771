use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::VerificationRecord;

/// Key-value persistence for verification records, keyed by identifier.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    async fn get(&self, identifier: &str) -> AppResult<Option<VerificationRecord>>;

    /// Full overwrite of whatever is stored under `record.identifier`.
    async fn put(&self, record: &VerificationRecord) -> AppResult<()>;

    /// Deleting an absent identifier is not an error.
    async fn delete(&self, identifier: &str) -> AppResult<()>;

    /// Removes every record with `expires_at < now_ms`, returning how many went.
    async fn purge_expired(&self, now_ms: i64) -> AppResult<u64>;
}
