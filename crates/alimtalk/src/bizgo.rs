//! Bizgo OMNI adapter: the production alimtalk provider.

use serde::Deserialize;
use serde_json::json;

use crate::gateway::{NotificationGateway, NotifyError};
use crate::message::{is_valid_mobile, normalize_phone, OutboundMessage};

const DEFAULT_BASE_URL: &str = "https://mars.ibapi.kr/api/comm";

/// Result code the provider returns for an accepted destination.
const RESULT_CODE_OK: &str = "A000";

/// Connection settings for the Bizgo OMNI API.
#[derive(Debug, Clone)]
pub struct BizgoConfig {
    pub api_key: String,
    pub sender_key: String,
    pub base_url: String,
}

impl BizgoConfig {
    pub fn new(api_key: String, sender_key: String) -> Self {
        Self {
            api_key,
            sender_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Sends alimtalk messages through the Bizgo OMNI `send/omni` endpoint.
pub struct BizgoGateway {
    config: BizgoConfig,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct OmniResponse {
    destinations: Option<Vec<OmniDestination>>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmniDestination {
    code: Option<String>,
    result: Option<String>,
    #[serde(rename = "msgKey")]
    msg_key: Option<String>,
}

impl BizgoGateway {
    pub fn new(config: BizgoConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn request_body(&self, message: &OutboundMessage, phone: &str) -> serde_json::Value {
        let text = message.body();
        let url = &message.confirm_url;
        json!({
            "messageFlow": [{
                "alimtalk": {
                    "senderKey": self.config.sender_key,
                    "templateCode": message.kind.template_code(),
                    "msgType": "AT",
                    "text": text,
                    "buttons": [{
                        "name": message.kind.button_label(),
                        "type": "WL",
                        "urlMobile": url,
                        "urlPc": url,
                    }],
                }
            }],
            "destinations": [{ "to": phone }],
        })
    }
}

#[async_trait::async_trait]
impl NotificationGateway for BizgoGateway {
    async fn send(&self, message: &OutboundMessage) -> Result<String, NotifyError> {
        if self.config.api_key.is_empty() || self.config.sender_key.is_empty() {
            return Err(NotifyError::Credentials);
        }

        let phone = message.phone.as_deref().ok_or(NotifyError::NoPhoneNumber)?;
        let phone = normalize_phone(phone);
        if !is_valid_mobile(&phone) {
            return Err(NotifyError::Provider(format!(
                "Invalid phone number format: {phone}"
            )));
        }

        let url = format!("{}/v1/send/omni", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.config.api_key)
            .json(&self.request_body(message, &phone))
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = response.status();
        let body: OmniResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::Provider(format!("Malformed provider response: {e}")))?;

        if !status.is_success() {
            return Err(NotifyError::Provider(
                body.message
                    .or(body.error)
                    .unwrap_or_else(|| format!("HTTP {status}")),
            ));
        }

        let dest = body
            .destinations
            .and_then(|mut d| if d.is_empty() { None } else { Some(d.remove(0)) })
            .ok_or_else(|| NotifyError::Provider("No destination result".to_string()))?;

        let accepted = dest.code.as_deref() == Some(RESULT_CODE_OK)
            || dest.result.as_deref() == Some("SUCCESS");
        if accepted {
            Ok(dest.msg_key.unwrap_or_default())
        } else {
            Err(NotifyError::Provider(format!(
                "Delivery rejected: code={:?} result={:?}",
                dest.code, dest.result
            )))
        }
    }

    fn name(&self) -> &'static str {
        "bizgo"
    }
}
