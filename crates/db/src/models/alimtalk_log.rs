//! Outbound notification log models.

use inkflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `alimtalk_logs` table. One row per outbound send attempt.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlimtalkLog {
    pub id: DbId,
    pub client_id: Option<DbId>,
    pub manuscript_id: Option<DbId>,
    pub template_code: String,
    pub phone: String,
    pub status: String,
    pub response: Option<String>,
    pub created_at: Timestamp,
}

/// Send outcome recorded in the log.
pub const LOG_STATUS_SUCCESS: &str = "success";
pub const LOG_STATUS_FAIL: &str = "fail";

/// Insert payload for a notification log entry.
#[derive(Debug, Clone)]
pub struct NewAlimtalkLog {
    pub client_id: Option<DbId>,
    pub manuscript_id: Option<DbId>,
    pub template_code: String,
    pub phone: String,
    pub status: String,
    pub response: Option<String>,
}
