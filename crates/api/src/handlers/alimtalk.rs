//! Handlers for manual notification sends and the send log.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use inkflow_alimtalk::{MessageKind, OutboundMessage};
use inkflow_core::error::CoreError;
use inkflow_core::types::DbId;
use inkflow_db::models::alimtalk_log::{NewAlimtalkLog, LOG_STATUS_FAIL, LOG_STATUS_SUCCESS};
use inkflow_db::repositories::AlimtalkLogRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for POST /api/v1/alimtalk/send.
#[derive(Debug, Deserialize)]
pub struct ManualSendRequest {
    pub template_code: String,
    pub phone: String,
    pub client_id: Option<DbId>,
    pub manuscript_id: Option<DbId>,
    pub client_name: Option<String>,
    pub confirm_url: Option<String>,
}

/// POST /api/v1/alimtalk/send
///
/// Staff-triggered retry of a single notification. Every attempt is
/// recorded in the send log, success or not.
pub async fn manual_send(
    State(state): State<AppState>,
    Json(input): Json<ManualSendRequest>,
) -> AppResult<impl IntoResponse> {
    let kind = MessageKind::from_template_code(&input.template_code).ok_or_else(|| {
        CoreError::Validation(format!("Unknown template code '{}'", input.template_code))
    })?;
    if input.phone.trim().is_empty() {
        return Err(CoreError::Validation("Phone number is required".to_string()).into());
    }

    let message = OutboundMessage {
        kind,
        phone: Some(input.phone.clone()),
        client_id: input.client_id,
        manuscript_id: input.manuscript_id,
        client_name: input.client_name.unwrap_or_default(),
        confirm_url: input.confirm_url.unwrap_or_default(),
        manuscript_title: None,
    };

    let result = state.notifier.send_one(&message).await;

    let log = NewAlimtalkLog {
        client_id: message.client_id,
        manuscript_id: message.manuscript_id,
        template_code: kind.template_code().to_string(),
        phone: message.phone.clone().unwrap_or_default(),
        status: if result.is_ok() {
            LOG_STATUS_SUCCESS.to_string()
        } else {
            LOG_STATUS_FAIL.to_string()
        },
        response: match &result {
            Ok(message_id) => Some(message_id.clone()),
            Err(e) => Some(e.to_string()),
        },
    };
    if let Err(e) = AlimtalkLogRepo::record(&state.pool, &log).await {
        tracing::warn!(error = %e, "Failed to record alimtalk log");
    }

    match result {
        Ok(message_id) => Ok(Json(json!({
            "success": true,
            "message_id": message_id,
        }))),
        Err(e) => Err(CoreError::Upstream(e.to_string()).into()),
    }
}

/// Query parameters for the send log.
#[derive(Debug, Default, Deserialize)]
pub struct LogListParams {
    pub client_id: Option<DbId>,
    pub limit: Option<i64>,
}

/// GET /api/v1/alimtalk/logs
pub async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<LogListParams>,
) -> AppResult<impl IntoResponse> {
    let logs =
        AlimtalkLogRepo::list(&state.pool, params.client_id, params.limit.unwrap_or(50)).await?;
    Ok(Json(DataResponse { data: logs }))
}
