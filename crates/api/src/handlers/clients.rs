//! Handlers for client (advertiser) management.
//!
//! Clients are soft-deactivated on delete and retained indefinitely.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use inkflow_core::clients::validate_client_type;
use inkflow_core::error::CoreError;
use inkflow_core::types::DbId;
use inkflow_db::models::client::{ClientFilter, CreateClient, UpdateClient};
use inkflow_db::repositories::ClientRepo;

use crate::error::AppResult;
use crate::query::PageParams;
use crate::response::{DataResponse, Paginated, Pagination};
use crate::state::AppState;

/// Query parameters for the client list.
///
/// Pagination fields are inlined rather than `#[serde(flatten)]`ed:
/// flattened numeric fields do not survive query-string deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct ClientListParams {
    pub search: Option<String>,
    pub business_type: Option<String>,
    pub is_active: Option<bool>,
    pub client_type: Option<String>,
    pub manager: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ClientListParams {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// GET /api/v1/clients
pub async fn list_clients(
    State(state): State<AppState>,
    Query(params): Query<ClientListParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.page_params();
    let filter = ClientFilter {
        search: non_empty(params.search),
        business_type: non_empty(params.business_type),
        is_active: params.is_active,
        client_type: non_empty(params.client_type),
        manager: non_empty(params.manager),
    };

    let clients = ClientRepo::list(&state.pool, &filter, page.limit(), page.offset()).await?;
    let total = ClientRepo::count(&state.pool, &filter).await?;

    Ok(Json(Paginated {
        data: clients,
        pagination: Pagination::new(page.page(), page.limit(), total),
    }))
}

/// POST /api/v1/clients
pub async fn create_client(
    State(state): State<AppState>,
    Json(input): Json<CreateClient>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() || input.region.trim().is_empty() {
        return Err(CoreError::Validation("Name and region are required".to_string()).into());
    }
    if let Some(client_type) = &input.client_type {
        validate_client_type(client_type)?;
    }

    let client = ClientRepo::create(&state.pool, &input).await?;

    tracing::info!(client_id = client.id, name = %client.name, "Client created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: client })))
}

/// GET /api/v1/clients/{id}
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Client", id })?;
    Ok(Json(DataResponse { data: client }))
}

/// PUT /api/v1/clients/{id}
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<impl IntoResponse> {
    if let Some(client_type) = &input.client_type {
        validate_client_type(client_type)?;
    }

    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Client", id })?;
    Ok(Json(DataResponse { data: client }))
}

/// DELETE /api/v1/clients/{id}
///
/// Soft-deactivates; the record is retained.
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deactivated = ClientRepo::deactivate(&state.pool, id).await?;
    if !deactivated && ClientRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(CoreError::NotFound { entity: "Client", id }.into());
    }

    tracing::info!(client_id = id, "Client deactivated");
    Ok(Json(json!({ "message": "Client deactivated" })))
}
