//! Thin proxies to the rewrite/generation gateway.
//!
//! Used by the admin UI to pre-rewrite manuscripts before a bulk send and
//! to draft one-off custom manuscripts. Gateway failures surface as 500s;
//! callers fall back to the unrewritten rendered text.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use inkflow_core::error::CoreError;
use inkflow_rewrite::{ClientBrief, GenerateRequest, RewriteRequest};

use crate::error::AppResult;
use crate::state::AppState;

/// Body for POST /api/v1/rewrite.
#[derive(Debug, Deserialize)]
pub struct RewriteBody {
    pub title: String,
    pub content: String,
    pub revision_request: Option<String>,
    /// `"revision"` applies the advertiser's requested changes instead of
    /// paraphrasing.
    pub mode: Option<String>,
}

/// POST /api/v1/rewrite
pub async fn rewrite(
    State(state): State<AppState>,
    Json(input): Json<RewriteBody>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(CoreError::Validation("Title and content are required".to_string()).into());
    }

    let revision_request = match input.mode.as_deref() {
        Some("revision") => input.revision_request.clone(),
        _ => None,
    };

    let draft = state
        .rewriter
        .rewrite(&RewriteRequest {
            title: input.title,
            content: input.content,
            revision_request,
        })
        .await?;

    Ok(Json(json!({
        "title": draft.title,
        "content": draft.content,
    })))
}

/// Client attributes supplied with a generation request.
#[derive(Debug, Deserialize)]
pub struct ClientBriefBody {
    pub name: String,
    pub region: String,
    pub business_type: String,
    pub main_service: Option<String>,
    pub differentiator: Option<String>,
}

/// Body for POST /api/v1/custom-generate.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub client: ClientBriefBody,
    pub topic: String,
}

/// POST /api/v1/custom-generate
pub async fn custom_generate(
    State(state): State<AppState>,
    Json(input): Json<GenerateBody>,
) -> AppResult<impl IntoResponse> {
    if input.topic.trim().is_empty() {
        return Err(CoreError::Validation("Topic is required".to_string()).into());
    }

    let draft = state
        .rewriter
        .generate(&GenerateRequest {
            client: ClientBrief {
                name: input.client.name,
                region: input.client.region,
                business_type: input.client.business_type,
                main_service: input.client.main_service,
                differentiator: input.client.differentiator,
            },
            topic: input.topic,
        })
        .await?;

    Ok(Json(json!({
        "title": draft.title,
        "content": draft.content,
    })))
}
