//! Development stub gateway: logs the message instead of delivering it.

use crate::gateway::{NotificationGateway, NotifyError};
use crate::message::OutboundMessage;

/// Logs every send at info level and always succeeds. The default adapter
/// when no provider credentials are configured.
#[derive(Debug, Default)]
pub struct ConsoleGateway;

#[async_trait::async_trait]
impl NotificationGateway for ConsoleGateway {
    async fn send(&self, message: &OutboundMessage) -> Result<String, NotifyError> {
        tracing::info!(
            kind = ?message.kind,
            client = %message.client_name,
            phone = message.phone.as_deref().unwrap_or("-"),
            confirm_url = %message.confirm_url,
            "alimtalk (console): {}",
            message.body().lines().next().unwrap_or_default()
        );
        Ok(format!("console-{}", uuid::Uuid::new_v4()))
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
