use serde::{Deserialize, Serialize};

/// The single stored code for one identifier. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    pub identifier: String,
    pub code: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub resend_count: i32,
    pub is_resend: bool,
}

impl VerificationRecord {
    /// Strictly after `expires_at`; the expiry instant itself is still valid.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }

    /// Milliseconds since issuance. Negative if the stored clock ran ahead.
    pub fn elapsed_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.created_at
    }
}
