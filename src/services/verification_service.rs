use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::OtpConfig;
use crate::database::VerificationStore;
use crate::error::{AppError, AppResult};
use crate::external::{DeliveryChannel, send_within};
use crate::models::*;
use crate::utils::*;

/// Issues and checks single-use verification codes, one live record per identifier.
///
/// Both operations hold a per-identifier lock across their read-check-write
/// sequence, so two requests for the same identifier in this process are
/// serialized. Store and delivery calls are bounded by the configured timeouts.
#[derive(Clone)]
pub struct VerificationService {
    store: Arc<dyn VerificationStore>,
    delivery: Arc<dyn DeliveryChannel>,
    clock: Arc<dyn Clock>,
    config: OtpConfig,
    template: String,
    locks: KeyedLocks,
}

impl VerificationService {
    pub fn new(
        store: Arc<dyn VerificationStore>,
        delivery: Arc<dyn DeliveryChannel>,
        clock: Arc<dyn Clock>,
        config: OtpConfig,
        template: impl Into<String>,
    ) -> Self {
        Self {
            store,
            delivery,
            clock,
            config,
            template: template.into(),
            locks: KeyedLocks::new(),
        }
    }

    /// Issues a fresh code for `identifier` unless its cooldown is still running.
    ///
    /// If delivery fails the freshly written record is deleted again, so a code
    /// that never reached the user cannot be verified and does not hold a cooldown.
    pub async fn request_code(&self, identifier: &str, is_resend: bool) -> AppResult<IssueOutcome> {
        if identifier.is_empty() {
            return Err(AppError::ValidationError("Phone number required".to_string()));
        }

        let _guard = self.locks.lock(identifier).await;

        let existing = self.with_store_timeout(self.store.get(identifier)).await?;
        let now = self.clock.now_ms();

        if let Some(record) = &existing {
            let cooldown_secs = self.cooldown_secs(is_resend);
            let remaining_ms = cooldown_secs * 1_000 - record.elapsed_ms(now);
            if remaining_ms > 0 {
                let wait_time = ceil_secs(remaining_ms).clamp(1, cooldown_secs);
                log::warn!("OTP request for {identifier} rate limited, wait {wait_time}s");
                return Err(AppError::RateLimited {
                    wait_time,
                    resend: is_resend,
                });
            }
        }

        let record = VerificationRecord {
            identifier: identifier.to_string(),
            code: generate_six_digit_code(),
            created_at: now,
            expires_at: now + self.config.code_ttl_secs * 1_000,
            resend_count: existing.as_ref().map_or(0, |r| r.resend_count + 1),
            is_resend,
        };
        self.with_store_timeout(self.store.put(&record)).await?;

        if let Err(e) = self.deliver(identifier, &record.code).await {
            if let Err(del_err) = self.with_store_timeout(self.store.delete(identifier)).await {
                log::error!("Failed to roll back undelivered OTP for {identifier}: {del_err}");
            }
            return Err(e);
        }

        log::info!(
            "OTP {} for {identifier} (resend_count={})",
            if is_resend { "resent" } else { "sent" },
            record.resend_count
        );
        Ok(if is_resend {
            IssueOutcome::Resent
        } else {
            IssueOutcome::Sent
        })
    }

    /// Checks `submitted` against the stored code. A match or an expired record
    /// deletes the record; a mismatch leaves it for another attempt.
    pub async fn verify_code(&self, identifier: &str, submitted: &str) -> AppResult<VerifyOutcome> {
        if identifier.is_empty() || submitted.is_empty() {
            return Err(AppError::ValidationError("Phone and code required".to_string()));
        }

        let _guard = self.locks.lock(identifier).await;

        let Some(record) = self.with_store_timeout(self.store.get(identifier)).await? else {
            return Ok(VerifyOutcome::NotFound);
        };

        if record.is_expired_at(self.clock.now_ms()) {
            self.with_store_timeout(self.store.delete(identifier)).await?;
            log::info!("Expired OTP for {identifier} removed on verify");
            return Ok(VerifyOutcome::Expired);
        }

        if record.code == submitted {
            self.with_store_timeout(self.store.delete(identifier)).await?;
            log::info!("OTP verified for {identifier}");
            Ok(VerifyOutcome::Verified)
        } else {
            log::warn!("Wrong OTP submitted for {identifier}");
            Ok(VerifyOutcome::Invalid)
        }
    }

    /// Deletes every record already past its expiry.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let now = self.clock.now_ms();
        self.with_store_timeout(self.store.purge_expired(now)).await
    }

    fn cooldown_secs(&self, is_resend: bool) -> i64 {
        if is_resend {
            self.config.resend_cooldown_secs
        } else {
            self.config.request_cooldown_secs
        }
    }

    /// The code fills both the template body and its copy-code button.
    async fn deliver(&self, identifier: &str, code: &str) -> AppResult<()> {
        let params = [code.to_string()];
        send_within(
            self.delivery.as_ref(),
            self.config.delivery_timeout_ms,
            identifier,
            &self.template,
            &params,
            &params,
        )
        .await
    }

    async fn with_store_timeout<T>(&self, fut: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        let limit = Duration::from_millis(self.config.storage_timeout_ms);
        match tokio::time::timeout(limit, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(AppError::StorageUnavailable(msg))) => Err(AppError::StorageUnavailable(msg)),
            Ok(Err(other)) => Err(AppError::StorageUnavailable(other.to_string())),
            Err(_) => Err(AppError::StorageUnavailable(format!(
                "store call timed out after {}ms",
                self.config.storage_timeout_ms
            ))),
        }
    }
}

fn ceil_secs(ms: i64) -> i64 {
    (ms + 999) / 1_000
}
