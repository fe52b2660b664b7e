//! Handlers for the public, token-authenticated confirmation endpoint.
//!
//! No session, no login: the confirm token is the sole credential. Unknown
//! tokens always produce the same `Invalid token` response, whether they
//! never existed or were rotated away by a resend.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use inkflow_core::error::CoreError;
use inkflow_core::manuscript::{resolve_targets, ConfirmAction, GroupMember};
use inkflow_core::types::DbId;
use inkflow_db::models::manuscript::Manuscript;
use inkflow_db::repositories::{ClientRepo, ManuscriptRepo, TemplateRepo};

use crate::error::AppResult;
use crate::state::AppState;

async fn find_by_token(state: &AppState, token: &str) -> AppResult<Manuscript> {
    Ok(ManuscriptRepo::find_by_token(&state.pool, token)
        .await?
        .ok_or(CoreError::InvalidToken)?)
}

/// GET /api/v1/confirm/{token}
///
/// The token's manuscript and, when grouped, every group sibling in
/// creation order, plus a display summary of the client.
pub async fn get_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let manuscript = find_by_token(&state, &token).await?;

    let manuscripts = match &manuscript.group_id {
        Some(group_id) => {
            let group = ManuscriptRepo::list_group(&state.pool, group_id).await?;
            if group.is_empty() {
                vec![manuscript.clone()]
            } else {
                group
            }
        }
        None => vec![manuscript.clone()],
    };

    let client = ClientRepo::find_by_id(&state.pool, manuscript.client_id).await?;

    Ok(Json(json!({
        "data": manuscript,
        "manuscripts": manuscripts,
        "client": client.map(|c| json!({
            "name": c.name,
            "region": c.region,
            "business_type": c.business_type,
        })),
    })))
}

/// Body for POST /api/v1/confirm/{token}.
#[derive(Debug, Deserialize)]
pub struct ConfirmActionRequest {
    pub action: String,
    pub revision_request: Option<String>,
    /// Target one specific manuscript instead of the whole group. Must
    /// belong to the token's group.
    pub manuscript_id: Option<DbId>,
}

/// POST /api/v1/confirm/{token}
///
/// Applies an approve or revision decision to the resolved target set. Only
/// manuscripts still `pending` participate; re-invoking after the group is
/// fully resolved yields `AlreadyProcessed` with the current status.
pub async fn act_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<ConfirmActionRequest>,
) -> AppResult<impl IntoResponse> {
    let manuscript = find_by_token(&state, &token).await?;
    let action = ConfirmAction::parse(&input.action)?;

    let siblings: Vec<GroupMember> = match &manuscript.group_id {
        Some(group_id) => ManuscriptRepo::list_group(&state.pool, group_id)
            .await?
            .into_iter()
            .map(|m| GroupMember {
                id: m.id,
                status: m.status,
            })
            .collect(),
        None => Vec::new(),
    };
    let token_member = GroupMember {
        id: manuscript.id,
        status: manuscript.status.clone(),
    };

    let targets = resolve_targets(&token_member, &siblings, input.manuscript_id)?;

    match action {
        ConfirmAction::Approve => approve(&state, &manuscript, &targets).await,
        ConfirmAction::Revision => {
            let text = input
                .revision_request
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    CoreError::Validation("Revision request text is required".to_string())
                })?;
            revise(&state, &manuscript, &targets, text).await
        }
    }
}

async fn approve(
    state: &AppState,
    manuscript: &Manuscript,
    targets: &[DbId],
) -> AppResult<axum::response::Response> {
    let updated = ManuscriptRepo::approve_pending(&state.pool, targets).await?;
    if updated.is_empty() {
        return Err(CoreError::AlreadyProcessed {
            status: manuscript.status.clone(),
        }
        .into());
    }

    // One aggregated increment per template rather than one per row;
    // increments commute, so the totals match the per-row version.
    let mut per_template: HashMap<DbId, i32> = HashMap::new();
    for m in &updated {
        if let Some(template_id) = m.template_id {
            *per_template.entry(template_id).or_default() += 1;
        }
    }
    for (template_id, count) in per_template {
        TemplateRepo::increment_approve_count(&state.pool, template_id, count).await?;
    }

    tracing::info!(
        manuscript_id = manuscript.id,
        group_id = manuscript.group_id.as_deref().unwrap_or("-"),
        count = updated.len(),
        "Manuscripts approved via confirm link"
    );
    Ok(Json(json!({
        "data": updated,
        "count": updated.len(),
        "message": "Approved successfully",
    }))
    .into_response())
}

async fn revise(
    state: &AppState,
    manuscript: &Manuscript,
    targets: &[DbId],
    revision_request: &str,
) -> AppResult<axum::response::Response> {
    // Row by row: the revision counter is a read-then-increment that the
    // repository folds into one conditional statement per manuscript.
    let mut updated = Vec::new();
    for id in targets {
        if let Some(m) = ManuscriptRepo::revise_pending(&state.pool, *id, revision_request).await? {
            updated.push(m);
        }
    }
    if updated.is_empty() {
        return Err(CoreError::AlreadyProcessed {
            status: manuscript.status.clone(),
        }
        .into());
    }

    tracing::info!(
        manuscript_id = manuscript.id,
        group_id = manuscript.group_id.as_deref().unwrap_or("-"),
        count = updated.len(),
        "Revision requested via confirm link"
    );
    Ok(Json(json!({
        "data": updated,
        "count": updated.len(),
        "message": "Revision request submitted",
    }))
    .into_response())
}
