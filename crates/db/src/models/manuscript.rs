//! Manuscript models.

use inkflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `manuscripts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Manuscript {
    pub id: DbId,
    pub client_id: DbId,
    /// NULL for ad-hoc custom manuscripts.
    pub template_id: Option<DbId>,
    pub title: String,
    pub content: String,
    pub status: String,
    pub revision_request: Option<String>,
    /// Incremented on every revision request, never reset. Survives resends
    /// and template changes as an audit trail.
    pub revision_count: i32,
    pub confirm_token: String,
    /// Shared by the manuscripts of one bulk-send batch for one client.
    pub group_id: Option<String>,
    pub sent_at: Timestamp,
    pub confirmed_at: Option<Timestamp>,
    pub reminded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new manuscript. Rows always start `pending`.
#[derive(Debug, Clone)]
pub struct NewManuscript {
    pub client_id: DbId,
    pub template_id: Option<DbId>,
    pub title: String,
    pub content: String,
    pub confirm_token: String,
    pub group_id: Option<String>,
    pub revision_count: i32,
}

/// DTO for the staff detail patch. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateManuscript {
    pub status: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub revision_request: Option<String>,
}

/// Optional filters for the manuscript list.
#[derive(Debug, Clone, Default)]
pub struct ManuscriptFilter {
    pub status: Option<String>,
    pub exclude_cancelled: bool,
}

/// A pending manuscript joined with its client's contact details, as
/// selected by the reminder sweep.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RemindableManuscript {
    pub id: DbId,
    pub client_id: DbId,
    pub confirm_token: String,
    pub title: String,
    pub client_name: String,
    pub contact: Option<String>,
}
