//! The notification gateway interface.

use crate::message::OutboundMessage;

/// Per-recipient delivery failures. A failed send never aborts a batch.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The recipient has no phone number on record. Raised locally, before
    /// any network call.
    #[error("No phone number")]
    NoPhoneNumber,

    #[error("Notification credentials not configured")]
    Credentials,

    /// The provider accepted the request but reported a delivery failure.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// A provider that can deliver one confirmation-link message to one phone
/// number. Implementations are hot-swappable via configuration; the rest of
/// the platform only sees this trait.
#[async_trait::async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Deliver one message, returning the provider's message id.
    async fn send(&self, message: &OutboundMessage) -> Result<String, NotifyError>;

    /// Short provider name for logs and config.
    fn name(&self) -> &'static str;
}
