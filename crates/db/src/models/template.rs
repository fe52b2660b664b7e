//! Content template models.

use inkflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `templates` table.
///
/// `send_count` and `approve_count` are owned by the lifecycle engine and
/// the dispatch orchestrator; they are never writable through CRUD.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub business_type: String,
    pub month: i32,
    pub week: Option<i32>,
    pub topic: Option<String>,
    pub title: String,
    pub content: String,
    pub send_count: i32,
    pub approve_count: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub business_type: String,
    pub month: i32,
    pub week: Option<i32>,
    pub topic: Option<String>,
    pub title: String,
    pub content: String,
}

/// DTO for updating a template. Only non-`None` fields are applied; the
/// counters are deliberately absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplate {
    pub business_type: Option<String>,
    pub month: Option<i32>,
    pub week: Option<i32>,
    pub topic: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Optional filters for the template list.
#[derive(Debug, Clone, Default)]
pub struct TemplateFilter {
    /// Substring match against title or topic.
    pub search: Option<String>,
    pub business_type: Option<String>,
    pub month: Option<i32>,
}
