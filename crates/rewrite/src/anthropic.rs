//! Anthropic Messages API adapter for the rewrite gateway.

use serde::Deserialize;
use serde_json::json;

use crate::gateway::{Draft, GenerateRequest, RewriteError, RewriteGateway, RewriteRequest};
use crate::prompt::{build_generate_prompt, build_rewrite_prompt, parse_draft};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-opus-5";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Connection settings for the Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl AnthropicConfig {
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Calls the Messages API and parses the `[TITLE]` / `[BODY]` reply.
pub struct AnthropicGateway {
    config: AnthropicConfig,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl AnthropicGateway {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Send one prompt and return the concatenated text blocks.
    async fn complete(&self, prompt: String) -> Result<String, RewriteError> {
        if self.config.api_key.is_empty() {
            return Err(RewriteError::Credentials);
        }

        let url = format!("{}/v1/messages", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&json!({
                "model": self.config.model,
                "max_tokens": MAX_TOKENS,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await
            .map_err(|e| RewriteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(RewriteError::Provider(detail));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| RewriteError::Provider(format!("Malformed response: {e}")))?;

        if body.stop_reason.as_deref() == Some("refusal") {
            return Err(RewriteError::Provider("Request was refused".to_string()));
        }

        let text: String = body
            .content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            return Err(RewriteError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl RewriteGateway for AnthropicGateway {
    async fn rewrite(&self, request: &RewriteRequest) -> Result<Draft, RewriteError> {
        let mode = if request.revision_request.is_some() {
            "revision"
        } else {
            "rewrite"
        };
        tracing::debug!(model = %self.config.model, mode, "Rewrite request");
        let text = self.complete(build_rewrite_prompt(request)).await?;
        Ok(parse_draft(&text, &request.title))
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Draft, RewriteError> {
        tracing::debug!(model = %self.config.model, topic = %request.topic, "Generate request");
        let text = self.complete(build_generate_prompt(request)).await?;
        Ok(parse_draft(&text, &request.topic))
    }
}
