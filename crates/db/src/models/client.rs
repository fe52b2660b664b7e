//! Client (advertiser) models.

use inkflow_core::render::PlaceholderValues;
use inkflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `clients` table. Clients are soft-deactivated, never
/// hard-deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub region: String,
    pub business_type: String,
    pub main_service: Option<String>,
    pub differentiator: Option<String>,
    pub contact: Option<String>,
    pub memo: Option<String>,
    pub is_active: bool,
    pub client_type: String,
    pub manager: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Client {
    /// The attributes the template renderer substitutes for this client.
    pub fn placeholder_values(&self) -> PlaceholderValues {
        PlaceholderValues {
            business_name: self.name.clone(),
            region: self.region.clone(),
            main_service: self.main_service.clone(),
            differentiator: self.differentiator.clone(),
            contact: self.contact.clone(),
        }
    }
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub region: String,
    pub business_type: String,
    pub main_service: Option<String>,
    pub differentiator: Option<String>,
    pub contact: Option<String>,
    pub memo: Option<String>,
    pub client_type: Option<String>,
    pub manager: Option<String>,
}

/// DTO for updating a client. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub region: Option<String>,
    pub business_type: Option<String>,
    pub main_service: Option<String>,
    pub differentiator: Option<String>,
    pub contact: Option<String>,
    pub memo: Option<String>,
    pub client_type: Option<String>,
    pub manager: Option<String>,
}

/// Optional filters for the client list.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    /// Substring match against name or region.
    pub search: Option<String>,
    pub business_type: Option<String>,
    pub is_active: Option<bool>,
    pub client_type: Option<String>,
    pub manager: Option<String>,
}
