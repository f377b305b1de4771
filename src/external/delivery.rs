use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};

/// Outbound channel that carries a templated message to an identifier.
///
/// `body` fills the template body placeholders. `buttons` fills a URL button
/// and is empty for templates without one.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send(
        &self,
        identifier: &str,
        template: &str,
        body: &[String],
        buttons: &[String],
    ) -> AppResult<()>;
}

/// Sends through `channel`, reporting every failure and a timeout as `DeliveryFailed`.
pub async fn send_within(
    channel: &dyn DeliveryChannel,
    timeout_ms: u64,
    identifier: &str,
    template: &str,
    body: &[String],
    buttons: &[String],
) -> AppResult<()> {
    let limit = Duration::from_millis(timeout_ms);
    match tokio::time::timeout(limit, channel.send(identifier, template, body, buttons)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(AppError::DeliveryFailed(msg))) => Err(AppError::DeliveryFailed(msg)),
        Ok(Err(other)) => Err(AppError::DeliveryFailed(other.to_string())),
        Err(_) => Err(AppError::DeliveryFailed(format!(
            "delivery timed out after {timeout_ms}ms"
        ))),
    }
}

/// Development channel: writes the message to the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDelivery;

#[async_trait]
impl DeliveryChannel for LogDelivery {
    async fn send(
        &self,
        identifier: &str,
        template: &str,
        body: &[String],
        _buttons: &[String],
    ) -> AppResult<()> {
        log::info!(
            "[log delivery] to={identifier} template={template} params={}",
            body.join(",")
        );
        Ok(())
    }
}
