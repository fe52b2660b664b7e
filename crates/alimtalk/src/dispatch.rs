//! Sequential bulk dispatch with per-recipient failure tracking.

use std::sync::Arc;
use std::time::Duration;

use inkflow_core::types::DbId;
use serde::Serialize;

use crate::gateway::{NotificationGateway, NotifyError};
use crate::message::OutboundMessage;

/// Outcome for one recipient of a bulk send.
#[derive(Debug, Clone, Serialize)]
pub struct RecipientResult {
    pub client_id: Option<DbId>,
    pub client_name: String,
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

/// Aggregated outcome of a bulk send. Individual failures never abort the
/// batch; they are collected here for staff to retry manually.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkReport {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub results: Vec<RecipientResult>,
}

impl BulkReport {
    /// Human-readable error lines for the failed recipients.
    pub fn errors(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| {
                format!(
                    "{}: {}",
                    r.client_name,
                    r.error.as_deref().unwrap_or("unknown error")
                )
            })
            .collect()
    }
}

/// Drives a [`NotificationGateway`] for single and bulk sends.
///
/// Bulk sends go out sequentially with a small pause between recipients to
/// stay inside the provider's rate limits.
pub struct Dispatcher {
    gateway: Arc<dyn NotificationGateway>,
    send_interval: Duration,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn NotificationGateway>, send_interval: Duration) -> Self {
        Self {
            gateway,
            send_interval,
        }
    }

    pub fn gateway_name(&self) -> &'static str {
        self.gateway.name()
    }

    /// Send one message. A missing phone number fails here, without
    /// touching the network.
    pub async fn send_one(&self, message: &OutboundMessage) -> Result<String, NotifyError> {
        if message.phone.as_deref().map_or(true, |p| p.trim().is_empty()) {
            tracing::warn!(client = %message.client_name, "Notification skipped: no phone number");
            return Err(NotifyError::NoPhoneNumber);
        }

        match self.gateway.send(message).await {
            Ok(message_id) => {
                tracing::info!(
                    provider = self.gateway.name(),
                    client = %message.client_name,
                    message_id = %message_id,
                    "Notification sent"
                );
                Ok(message_id)
            }
            Err(e) => {
                tracing::error!(
                    provider = self.gateway.name(),
                    client = %message.client_name,
                    error = %e,
                    "Notification failed"
                );
                Err(e)
            }
        }
    }

    /// Send a batch sequentially, one message per recipient, tolerating
    /// individual failures.
    pub async fn send_bulk(&self, messages: &[OutboundMessage]) -> BulkReport {
        let mut report = BulkReport {
            total: messages.len(),
            ..Default::default()
        };

        for (i, message) in messages.iter().enumerate() {
            if i > 0 && !self.send_interval.is_zero() {
                tokio::time::sleep(self.send_interval).await;
            }

            let result = self.send_one(message).await;
            let recipient = match result {
                Ok(message_id) => {
                    report.success += 1;
                    RecipientResult {
                        client_id: message.client_id,
                        client_name: message.client_name.clone(),
                        success: true,
                        message_id: Some(message_id),
                        error: None,
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    RecipientResult {
                        client_id: message.client_id,
                        client_name: message.client_name.clone(),
                        success: false,
                        message_id: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            report.results.push(recipient);
        }

        tracing::info!(
            provider = self.gateway.name(),
            total = report.total,
            success = report.success,
            failed = report.failed,
            "Bulk notification finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use super::*;
    use crate::message::MessageKind;

    /// Scripted gateway: fails for recipients whose name is listed.
    struct FakeGateway {
        fail_for: Vec<&'static str>,
        sent: Mutex<Vec<String>>,
    }

    impl FakeGateway {
        fn new(fail_for: Vec<&'static str>) -> Self {
            Self {
                fail_for,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl NotificationGateway for FakeGateway {
        async fn send(&self, message: &OutboundMessage) -> Result<String, NotifyError> {
            if self.fail_for.contains(&message.client_name.as_str()) {
                return Err(NotifyError::Provider("scripted failure".to_string()));
            }
            self.sent.lock().unwrap().push(message.client_name.clone());
            Ok(format!("msg-{}", message.client_name))
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    fn message(name: &str, phone: Option<&str>) -> OutboundMessage {
        OutboundMessage {
            kind: MessageKind::ConfirmRequest,
            phone: phone.map(str::to_string),
            client_id: Some(1),
            manuscript_id: None,
            client_name: name.to_string(),
            confirm_url: "https://example.com/confirm/tok".to_string(),
            manuscript_title: None,
        }
    }

    fn dispatcher(gateway: FakeGateway) -> Dispatcher {
        Dispatcher::new(Arc::new(gateway), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_missing_phone_fails_locally() {
        let d = dispatcher(FakeGateway::new(vec![]));
        let result = d.send_one(&message("A", None)).await;
        assert_matches!(result, Err(NotifyError::NoPhoneNumber));
    }

    #[tokio::test]
    async fn test_blank_phone_fails_locally() {
        let d = dispatcher(FakeGateway::new(vec![]));
        let result = d.send_one(&message("A", Some("  "))).await;
        assert_matches!(result, Err(NotifyError::NoPhoneNumber));
    }

    #[tokio::test]
    async fn test_bulk_tolerates_partial_failure() {
        let d = dispatcher(FakeGateway::new(vec!["B"]));
        let batch = vec![
            message("A", Some("010-1111-2222")),
            message("B", Some("010-3333-4444")),
            message("C", None),
        ];
        let report = d.send_bulk(&batch).await;

        assert_eq!(report.total, 3);
        assert_eq!(report.success, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(report.results.len(), 3);
        assert!(report.results[0].success);
        assert!(!report.results[1].success);
        assert!(!report.results[2].success);
        assert_eq!(report.errors().len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_preserves_recipient_order() {
        let gateway = Arc::new(FakeGateway::new(vec![]));
        let d = Dispatcher::new(gateway.clone(), Duration::ZERO);
        let batch = vec![
            message("A", Some("010-1111-2222")),
            message("B", Some("010-3333-4444")),
        ];
        let report = d.send_bulk(&batch).await;

        let names: Vec<&str> = report.results.iter().map(|r| r.client_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(*gateway.sent.lock().unwrap(), vec!["A", "B"]);
    }
}
