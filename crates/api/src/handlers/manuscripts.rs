//! Handlers for the manuscript lifecycle: listing, stats, staff edits, the
//! bulk dispatch orchestrator, resend, template change, and custom sends.

use std::collections::{HashMap, HashSet};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use inkflow_alimtalk::{MessageKind, OutboundMessage};
use inkflow_core::error::CoreError;
use inkflow_core::manuscript::{validate_status, ManuscriptStats};
use inkflow_core::render::render;
use inkflow_core::token::{new_confirm_token, new_group_id};
use inkflow_core::types::DbId;
use inkflow_db::models::alimtalk_log::{NewAlimtalkLog, LOG_STATUS_FAIL, LOG_STATUS_SUCCESS};
use inkflow_db::models::client::Client;
use inkflow_db::models::manuscript::{
    Manuscript, ManuscriptFilter, NewManuscript, UpdateManuscript,
};
use inkflow_db::models::template::Template;
use inkflow_db::repositories::{AlimtalkLogRepo, ClientRepo, ManuscriptRepo, TemplateRepo};

use crate::error::AppResult;
use crate::query::PageParams;
use crate::response::{DataResponse, Paginated, Pagination};
use crate::state::AppState;

/* --------------------------------------------------------------------------
Listing, stats, detail
-------------------------------------------------------------------------- */

/// Query parameters for the manuscript list.
///
/// Pagination fields are inlined rather than `#[serde(flatten)]`ed:
/// flattened numeric fields do not survive query-string deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct ManuscriptListParams {
    pub status: Option<String>,
    #[serde(default)]
    pub exclude_cancelled: bool,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ManuscriptListParams {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// GET /api/v1/manuscripts
pub async fn list_manuscripts(
    State(state): State<AppState>,
    Query(params): Query<ManuscriptListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &params.status {
        validate_status(status)?;
    }
    let page = params.page_params();
    let filter = ManuscriptFilter {
        status: params.status,
        exclude_cancelled: params.exclude_cancelled,
    };

    let manuscripts =
        ManuscriptRepo::list(&state.pool, &filter, page.limit(), page.offset()).await?;
    let total = ManuscriptRepo::count(&state.pool, &filter).await?;

    Ok(Json(Paginated {
        data: manuscripts,
        pagination: Pagination::new(page.page(), page.limit(), total),
    }))
}

/// GET /api/v1/manuscripts/stats
pub async fn manuscript_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let counts = ManuscriptRepo::status_counts(&state.pool).await?;
    Ok(Json(DataResponse {
        data: ManuscriptStats::from_counts(&counts),
    }))
}

/// Manuscript detail with its client and template joined in.
#[derive(Debug, Serialize)]
pub struct ManuscriptDetail {
    #[serde(flatten)]
    pub manuscript: Manuscript,
    pub client: Option<Client>,
    pub template: Option<Template>,
}

async fn load_detail(state: &AppState, manuscript: Manuscript) -> AppResult<ManuscriptDetail> {
    let client = ClientRepo::find_by_id(&state.pool, manuscript.client_id).await?;
    let template = match manuscript.template_id {
        Some(template_id) => TemplateRepo::find_by_id(&state.pool, template_id).await?,
        None => None,
    };
    Ok(ManuscriptDetail {
        manuscript,
        client,
        template,
    })
}

/// GET /api/v1/manuscripts/{id}
pub async fn get_manuscript(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let manuscript = ManuscriptRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Manuscript", id })?;
    let detail = load_detail(&state, manuscript).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/manuscripts/{id}
///
/// Staff patch of status/title/content/revision_request. Moving the status
/// to approved or revision stamps `confirmed_at`.
pub async fn update_manuscript(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateManuscript>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &input.status {
        validate_status(status)?;
    }

    let manuscript = ManuscriptRepo::update_fields(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Manuscript", id })?;
    let detail = load_detail(&state, manuscript).await?;
    Ok(Json(DataResponse { data: detail }))
}

/* --------------------------------------------------------------------------
Bulk dispatch
-------------------------------------------------------------------------- */

/// A pre-rewritten draft for one (template, client) pair.
#[derive(Debug, Clone, Deserialize)]
pub struct RewrittenContent {
    pub title: String,
    pub content: String,
}

/// Body for POST /api/v1/manuscripts.
///
/// `template_ids` is the fan-out path (1-2 templates, grouped per client).
/// The singular `template_id` is the legacy single-template path with no
/// group semantics. `rewritten_contents` is keyed template -> client.
#[derive(Debug, Deserialize)]
pub struct BulkSendRequest {
    #[serde(default)]
    pub template_ids: Vec<DbId>,
    pub template_id: Option<DbId>,
    pub client_ids: Vec<DbId>,
    #[serde(default)]
    pub rewritten_contents: HashMap<DbId, HashMap<DbId, RewrittenContent>>,
}

/// The confirm link returned for each client of a bulk send.
#[derive(Debug, Serialize)]
pub struct ConfirmLink {
    pub client_id: DbId,
    pub client_name: String,
    pub confirm_url: String,
    pub phone_number: Option<String>,
}

/// POST /api/v1/manuscripts
///
/// Fans {templates} x {clients} into manuscript creation, groups per client,
/// then notifies each client once with the group representative's confirm
/// link. Notification failures never fail the request; they come back in
/// `alimtalk.errors`.
pub async fn bulk_create(
    State(state): State<AppState>,
    Json(input): Json<BulkSendRequest>,
) -> AppResult<impl IntoResponse> {
    // The fan-out path wins when both shapes are supplied.
    let legacy = input.template_ids.is_empty();
    let mut template_ids = input.template_ids.clone();
    if legacy {
        template_ids.extend(input.template_id);
    }

    let mut seen = HashSet::new();
    template_ids.retain(|id| seen.insert(*id));

    if template_ids.is_empty() {
        return Err(CoreError::Validation("At least one template id is required".to_string()).into());
    }
    if template_ids.len() > 2 {
        return Err(CoreError::Validation(
            "A bulk send supports at most two templates".to_string(),
        )
        .into());
    }
    if input.client_ids.is_empty() {
        return Err(CoreError::Validation("At least one client id is required".to_string()).into());
    }

    // Unknown or inactive ids are silently dropped; an empty remainder is
    // an error. Iteration order is the caller's, so the "first manuscript
    // per client" rule is deterministic.
    let found_templates = TemplateRepo::find_active_many(&state.pool, &template_ids).await?;
    let templates: Vec<Template> = template_ids
        .iter()
        .filter_map(|id| found_templates.iter().find(|t| t.id == *id).cloned())
        .collect();
    if templates.is_empty() {
        return Err(CoreError::NotFound {
            entity: "Template",
            id: template_ids[0],
        }
        .into());
    }

    let mut client_ids = input.client_ids.clone();
    let mut seen = HashSet::new();
    client_ids.retain(|id| seen.insert(*id));

    let found_clients = ClientRepo::find_active_many(&state.pool, &client_ids).await?;
    let clients: Vec<Client> = client_ids
        .iter()
        .filter_map(|id| found_clients.iter().find(|c| c.id == *id).cloned())
        .collect();
    if clients.is_empty() {
        return Err(CoreError::NotFound {
            entity: "Client",
            id: client_ids[0],
        }
        .into());
    }

    // Create every manuscript before any notification goes out, so a slow
    // or failing provider can never leave a client with a partial group.
    let mut manuscripts: Vec<Manuscript> = Vec::with_capacity(clients.len() * templates.len());
    let mut confirm_links = Vec::with_capacity(clients.len());
    let mut outbound = Vec::with_capacity(clients.len());

    for client in &clients {
        let group_id = if legacy { None } else { Some(new_group_id()) };
        let values = client.placeholder_values();
        let first_of_client = manuscripts.len();

        for template in &templates {
            let rewritten = input
                .rewritten_contents
                .get(&template.id)
                .and_then(|per_client| per_client.get(&client.id));
            let (title, content) = match rewritten {
                Some(draft) => (draft.title.clone(), draft.content.clone()),
                None => (
                    render(&template.title, &values),
                    render(&template.content, &values),
                ),
            };

            let manuscript = ManuscriptRepo::create(
                &state.pool,
                &NewManuscript {
                    client_id: client.id,
                    template_id: Some(template.id),
                    title,
                    content,
                    confirm_token: new_confirm_token(),
                    group_id: group_id.clone(),
                    revision_count: 0,
                },
            )
            .await?;
            manuscripts.push(manuscript);
        }

        // The client's first-created manuscript is the group representative;
        // its token is the one the client receives.
        let representative = &manuscripts[first_of_client];
        let confirm_url = state.config.confirm_url(&representative.confirm_token);
        confirm_links.push(ConfirmLink {
            client_id: client.id,
            client_name: client.name.clone(),
            confirm_url: confirm_url.clone(),
            phone_number: client.contact.clone(),
        });
        outbound.push(OutboundMessage {
            kind: MessageKind::ConfirmRequest,
            phone: client.contact.clone(),
            client_id: Some(client.id),
            manuscript_id: Some(representative.id),
            client_name: client.name.clone(),
            confirm_url,
            manuscript_title: Some(representative.title.clone()),
        });
    }

    // Once per client per template.
    for template in &templates {
        TemplateRepo::increment_send_count(&state.pool, template.id, clients.len() as i32).await?;
    }

    let report = state.notifier.send_bulk(&outbound).await;
    log_bulk_report(&state, &outbound, &report).await;

    tracing::info!(
        manuscripts = manuscripts.len(),
        clients = clients.len(),
        templates = templates.len(),
        notified = report.success,
        "Bulk dispatch complete"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "data": manuscripts,
            "confirmLinks": confirm_links,
            "alimtalk": {
                "total": report.total,
                "success": report.success,
                "failed": report.failed,
                "errors": report.errors(),
            },
        })),
    ))
}

/// Record one log row per recipient of a bulk send. Logging failures are
/// not allowed to fail the request.
async fn log_bulk_report(
    state: &AppState,
    outbound: &[OutboundMessage],
    report: &inkflow_alimtalk::BulkReport,
) {
    for (message, result) in outbound.iter().zip(report.results.iter()) {
        let log = NewAlimtalkLog {
            client_id: message.client_id,
            manuscript_id: message.manuscript_id,
            template_code: message.kind.template_code().to_string(),
            phone: message.phone.clone().unwrap_or_default(),
            status: if result.success {
                LOG_STATUS_SUCCESS.to_string()
            } else {
                LOG_STATUS_FAIL.to_string()
            },
            response: result
                .message_id
                .clone()
                .or_else(|| result.error.clone()),
        };
        if let Err(e) = AlimtalkLogRepo::record(&state.pool, &log).await {
            tracing::warn!(error = %e, "Failed to record alimtalk log");
        }
    }
}

/// Send one notification and record the attempt. Failures are logged and
/// swallowed; staff retry through the admin UI.
pub(crate) async fn notify_and_log(state: &AppState, message: &OutboundMessage) {
    let result = state.notifier.send_one(message).await;
    let log = NewAlimtalkLog {
        client_id: message.client_id,
        manuscript_id: message.manuscript_id,
        template_code: message.kind.template_code().to_string(),
        phone: message.phone.clone().unwrap_or_default(),
        status: if result.is_ok() {
            LOG_STATUS_SUCCESS.to_string()
        } else {
            LOG_STATUS_FAIL.to_string()
        },
        response: match result {
            Ok(message_id) => Some(message_id),
            Err(e) => Some(e.to_string()),
        },
    };
    if let Err(e) = AlimtalkLogRepo::record(&state.pool, &log).await {
        tracing::warn!(error = %e, "Failed to record alimtalk log");
    }
}

/* --------------------------------------------------------------------------
Staff lifecycle transitions
-------------------------------------------------------------------------- */

/// Body for POST /api/v1/manuscripts/{id}/resend.
#[derive(Debug, Deserialize)]
pub struct ResendRequest {
    pub title: String,
    pub content: String,
}

/// POST /api/v1/manuscripts/{id}/resend
///
/// Mints a fresh confirm token, resets the manuscript to `pending`, and
/// notifies the client that their revision has been applied. The revision
/// counter and group membership are untouched.
pub async fn resend_manuscript(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResendRequest>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(CoreError::Validation("Title and content are required".to_string()).into());
    }

    let token = new_confirm_token();
    let manuscript = ManuscriptRepo::resend(&state.pool, id, &input.title, &input.content, &token)
        .await?
        .ok_or(CoreError::NotFound { entity: "Manuscript", id })?;

    let confirm_url = state.config.confirm_url(&token);
    if let Some(client) = ClientRepo::find_by_id(&state.pool, manuscript.client_id).await? {
        notify_and_log(
            &state,
            &OutboundMessage {
                kind: MessageKind::RevisionComplete,
                phone: client.contact.clone(),
                client_id: Some(client.id),
                manuscript_id: Some(manuscript.id),
                client_name: client.name.clone(),
                confirm_url: confirm_url.clone(),
                manuscript_title: Some(manuscript.title.clone()),
            },
        )
        .await;
    }

    tracing::info!(manuscript_id = id, "Manuscript resent");
    Ok(Json(json!({
        "data": manuscript,
        "confirmUrl": confirm_url,
        "message": "Manuscript resent",
    })))
}

/// Body for POST /api/v1/manuscripts/{id}/change-template.
#[derive(Debug, Deserialize)]
pub struct ChangeTemplateRequest {
    pub template_id: DbId,
    pub title: String,
    pub content: String,
}

/// POST /api/v1/manuscripts/{id}/change-template
///
/// Retires the old manuscript as `cancelled` and inserts a replacement on
/// the new template, atomically. The replacement inherits the revision
/// counter as an audit trail but leaves the old group and gets its own
/// fresh confirm token; it is materially a different manuscript.
pub async fn change_template(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeTemplateRequest>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(CoreError::Validation("Title and content are required".to_string()).into());
    }

    let old = ManuscriptRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Manuscript", id })?;
    let template = TemplateRepo::find_by_id(&state.pool, input.template_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Template",
            id: input.template_id,
        })?;

    let token = new_confirm_token();
    let manuscript = ManuscriptRepo::change_template(
        &state.pool,
        old.id,
        &NewManuscript {
            client_id: old.client_id,
            template_id: Some(template.id),
            title: input.title.clone(),
            content: input.content.clone(),
            confirm_token: token.clone(),
            group_id: None,
            revision_count: old.revision_count,
        },
    )
    .await?;

    let confirm_url = state.config.confirm_url(&token);
    if let Some(client) = ClientRepo::find_by_id(&state.pool, manuscript.client_id).await? {
        notify_and_log(
            &state,
            &OutboundMessage {
                kind: MessageKind::ConfirmRequest,
                phone: client.contact.clone(),
                client_id: Some(client.id),
                manuscript_id: Some(manuscript.id),
                client_name: client.name.clone(),
                confirm_url: confirm_url.clone(),
                manuscript_title: Some(manuscript.title.clone()),
            },
        )
        .await;
    }

    tracing::info!(
        old_manuscript_id = old.id,
        new_manuscript_id = manuscript.id,
        template_id = template.id,
        "Template changed"
    );
    Ok(Json(json!({
        "data": manuscript,
        "confirmUrl": confirm_url,
        "message": "Template changed",
    })))
}

/* --------------------------------------------------------------------------
Custom sends
-------------------------------------------------------------------------- */

/// Body for POST /api/v1/custom-send.
#[derive(Debug, Deserialize)]
pub struct CustomSendRequest {
    pub client_id: DbId,
    pub title: String,
    pub content: String,
    pub topic: Option<String>,
}

/// POST /api/v1/custom-send
///
/// One-off manuscript for a custom client: no template, no group.
pub async fn custom_send(
    State(state): State<AppState>,
    Json(input): Json<CustomSendRequest>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(CoreError::Validation("Title and content are required".to_string()).into());
    }

    let client = ClientRepo::find_active_by_id(&state.pool, input.client_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Client",
            id: input.client_id,
        })?;

    let token = new_confirm_token();
    let manuscript = ManuscriptRepo::create(
        &state.pool,
        &NewManuscript {
            client_id: client.id,
            template_id: None,
            title: input.title.clone(),
            content: input.content.clone(),
            confirm_token: token.clone(),
            group_id: None,
            revision_count: 0,
        },
    )
    .await?;

    let confirm_url = state.config.confirm_url(&token);
    let message = OutboundMessage {
        kind: MessageKind::ConfirmRequest,
        phone: client.contact.clone(),
        client_id: Some(client.id),
        manuscript_id: Some(manuscript.id),
        client_name: client.name.clone(),
        confirm_url: confirm_url.clone(),
        manuscript_title: input.topic.clone().or(Some(manuscript.title.clone())),
    };
    let report = state.notifier.send_bulk(std::slice::from_ref(&message)).await;
    log_bulk_report(&state, std::slice::from_ref(&message), &report).await;

    tracing::info!(
        manuscript_id = manuscript.id,
        client_id = client.id,
        "Custom manuscript sent"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "data": manuscript,
            "confirmLink": {
                "client_id": client.id,
                "client_name": client.name,
                "confirm_url": confirm_url,
            },
            "alimtalk": {
                "total": report.total,
                "success": report.success,
                "failed": report.failed,
                "errors": report.errors(),
            },
        })),
    ))
}
