//! Handlers for content template management.
//!
//! The send/approve counters are owned by the lifecycle engine; template
//! CRUD can never touch them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use inkflow_core::error::CoreError;
use inkflow_core::template::{validate_month, validate_week};
use inkflow_core::types::DbId;
use inkflow_db::models::template::{CreateTemplate, TemplateFilter, UpdateTemplate};
use inkflow_db::repositories::TemplateRepo;

use crate::error::AppResult;
use crate::query::PageParams;
use crate::response::{DataResponse, Paginated, Pagination};
use crate::state::AppState;

/// Query parameters for the template list.
///
/// Pagination fields are inlined rather than `#[serde(flatten)]`ed:
/// flattened numeric fields do not survive query-string deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct TemplateListParams {
    pub search: Option<String>,
    pub business_type: Option<String>,
    pub month: Option<i32>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl TemplateListParams {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// A template with its derived confirm rate, as returned by the API.
#[derive(Debug, serde::Serialize)]
pub struct TemplateWithRate {
    #[serde(flatten)]
    pub template: inkflow_db::models::template::Template,
    /// Rounded percentage of sends that were approved.
    pub confirm_rate: i32,
}

impl From<inkflow_db::models::template::Template> for TemplateWithRate {
    fn from(template: inkflow_db::models::template::Template) -> Self {
        let confirm_rate =
            inkflow_core::template::confirm_rate(template.send_count, template.approve_count);
        Self {
            template,
            confirm_rate,
        }
    }
}

/// GET /api/v1/templates
///
/// Active templates only, best confirm performers first.
pub async fn list_templates(
    State(state): State<AppState>,
    Query(params): Query<TemplateListParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.page_params();
    let filter = TemplateFilter {
        search: params.search.filter(|s| !s.trim().is_empty()),
        business_type: params.business_type.filter(|s| !s.trim().is_empty()),
        month: params.month,
    };

    let templates = TemplateRepo::list(&state.pool, &filter, page.limit(), page.offset()).await?;
    let total = TemplateRepo::count(&state.pool, &filter).await?;

    Ok(Json(Paginated {
        data: templates.into_iter().map(TemplateWithRate::from).collect(),
        pagination: Pagination::new(page.page(), page.limit(), total),
    }))
}

/// POST /api/v1/templates
pub async fn create_template(
    State(state): State<AppState>,
    Json(input): Json<CreateTemplate>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(CoreError::Validation("Title and content are required".to_string()).into());
    }
    validate_month(input.month)?;
    validate_week(input.week)?;

    let template = TemplateRepo::create(&state.pool, &input).await?;

    tracing::info!(template_id = template.id, title = %template.title, "Template created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: TemplateWithRate::from(template),
        }),
    ))
}

/// GET /api/v1/templates/{id}
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Template", id })?;
    Ok(Json(DataResponse {
        data: TemplateWithRate::from(template),
    }))
}

/// PUT /api/v1/templates/{id}
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<impl IntoResponse> {
    if let Some(month) = input.month {
        validate_month(month)?;
    }
    validate_week(input.week)?;

    let template = TemplateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Template", id })?;
    Ok(Json(DataResponse {
        data: TemplateWithRate::from(template),
    }))
}

/// DELETE /api/v1/templates/{id}
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deactivated = TemplateRepo::deactivate(&state.pool, id).await?;
    if !deactivated && TemplateRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(CoreError::NotFound { entity: "Template", id }.into());
    }

    tracing::info!(template_id = id, "Template deactivated");
    Ok(Json(json!({ "message": "Template deactivated" })))
}
