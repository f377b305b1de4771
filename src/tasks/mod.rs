//! Background scheduled tasks for the application.
//!
//! Expired verification records are otherwise only removed when someone tries
//! to verify against them; the reaper keeps abandoned ones from piling up.
//! Call `spawn_all` once during startup to launch them.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::OtpConfig;
use crate::services::VerificationService;

/// Spawn all background tasks. Returns the handles of the tasks started.
pub fn spawn_all(verification_service: VerificationService, otp: &OtpConfig) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    if otp.reaper_interval_secs > 0 {
        handles.push(spawn_reaper(
            verification_service,
            Duration::from_secs(otp.reaper_interval_secs),
        ));
    } else {
        log::info!("Expired OTP reaper disabled");
    }

    handles
}

pub fn spawn_reaper(svc: VerificationService, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match svc.purge_expired().await {
                Ok(n) if n > 0 => log::info!("Expired OTP records purged: {n}"),
                Ok(_) => {}
                Err(e) => log::error!("Failed to purge expired OTP records: {e:?}"),
            }
        }
    })
}
