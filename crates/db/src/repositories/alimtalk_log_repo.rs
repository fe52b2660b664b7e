//! Repository for the `alimtalk_logs` table.

use inkflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::alimtalk_log::{AlimtalkLog, NewAlimtalkLog};

/// Column list for `alimtalk_logs` queries.
const COLUMNS: &str =
    "id, client_id, manuscript_id, template_code, phone, status, response, created_at";

/// Records outbound notification attempts.
pub struct AlimtalkLogRepo;

impl AlimtalkLogRepo {
    /// Insert a log row for one send attempt, returning the generated ID.
    pub async fn record(pool: &PgPool, input: &NewAlimtalkLog) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO alimtalk_logs \
                (client_id, manuscript_id, template_code, phone, status, response) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(input.client_id)
        .bind(input.manuscript_id)
        .bind(&input.template_code)
        .bind(&input.phone)
        .bind(&input.status)
        .bind(&input.response)
        .fetch_one(pool)
        .await
    }

    /// Most recent log rows, optionally filtered to one client.
    pub async fn list(
        pool: &PgPool,
        client_id: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<AlimtalkLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alimtalk_logs \
             WHERE ($1::bigint IS NULL OR client_id = $1) \
             ORDER BY created_at DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, AlimtalkLog>(&query)
            .bind(client_id)
            .bind(super::clamp_limit(limit))
            .fetch_all(pool)
            .await
    }
}
