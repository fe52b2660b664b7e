//! Repository for the `manuscripts` table.
//!
//! Every status transition here is a single conditional UPDATE guarded by
//! `status = 'pending'` (or the relevant prior status), so two concurrent
//! confirmations race safely: exactly one statement matches the row, the
//! other affects zero rows and the caller reports `AlreadyProcessed`. The
//! revision counter is incremented inside the same statement for the same
//! reason.

use chrono::{DateTime, Utc};
use inkflow_core::manuscript::{
    STATUS_APPROVED, STATUS_AUTO_APPROVED, STATUS_CANCELLED, STATUS_PENDING, STATUS_REVISION,
};
use inkflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::manuscript::{
    Manuscript, ManuscriptFilter, NewManuscript, RemindableManuscript, UpdateManuscript,
};

/// Column list for `manuscripts` queries.
const COLUMNS: &str = "id, client_id, template_id, title, content, status, revision_request, \
     revision_count, confirm_token, group_id, sent_at, confirmed_at, reminded_at, \
     created_at, updated_at";

/// Shared filter clause for list/count queries. Bind order:
/// $1 status, $2 exclude_cancelled.
const FILTER: &str = "($1::text IS NULL OR status = $1) \
     AND (NOT $2::boolean OR status <> 'cancelled')";

/// Provides persistence for the manuscript lifecycle.
pub struct ManuscriptRepo;

impl ManuscriptRepo {
    /// Insert a new `pending` manuscript, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewManuscript) -> Result<Manuscript, sqlx::Error> {
        let query = format!(
            "INSERT INTO manuscripts \
                (client_id, template_id, title, content, confirm_token, group_id, revision_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Manuscript>(&query)
            .bind(input.client_id)
            .bind(input.template_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.confirm_token)
            .bind(&input.group_id)
            .bind(input.revision_count)
            .fetch_one(pool)
            .await
    }

    /// Find a manuscript by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Manuscript>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manuscripts WHERE id = $1");
        sqlx::query_as::<_, Manuscript>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a confirm token to its manuscript.
    pub async fn find_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Manuscript>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manuscripts WHERE confirm_token = $1");
        sqlx::query_as::<_, Manuscript>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// All members of a group in creation order. The first row is the
    /// group representative whose token was distributed to the client.
    pub async fn list_group(
        pool: &PgPool,
        group_id: &str,
    ) -> Result<Vec<Manuscript>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM manuscripts \
             WHERE group_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Manuscript>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    /// List manuscripts matching the filter, most recently sent first.
    pub async fn list(
        pool: &PgPool,
        filter: &ManuscriptFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Manuscript>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM manuscripts \
             WHERE {FILTER} \
             ORDER BY sent_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Manuscript>(&query)
            .bind(&filter.status)
            .bind(filter.exclude_cancelled)
            .bind(super::clamp_limit(limit))
            .bind(super::clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Count manuscripts matching the filter.
    pub async fn count(pool: &PgPool, filter: &ManuscriptFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM manuscripts WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(&filter.status)
            .bind(filter.exclude_cancelled)
            .fetch_one(pool)
            .await
    }

    /// Per-status counts for the stats endpoint.
    pub async fn status_counts(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM manuscripts GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Approve every target manuscript that is still pending, stamping
    /// `confirmed_at`. Returns the rows actually updated; an empty result
    /// means no target was pending anymore.
    pub async fn approve_pending(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<Manuscript>, sqlx::Error> {
        let query = format!(
            "UPDATE manuscripts SET \
                status = '{STATUS_APPROVED}', \
                confirmed_at = NOW(), \
                updated_at = NOW() \
             WHERE id = ANY($1) AND status = '{STATUS_PENDING}' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Manuscript>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Record a revision request against one manuscript if it is still
    /// pending. The `revision_count` increment happens in the same statement,
    /// so concurrent edits cannot lose it.
    pub async fn revise_pending(
        pool: &PgPool,
        id: DbId,
        revision_request: &str,
    ) -> Result<Option<Manuscript>, sqlx::Error> {
        let query = format!(
            "UPDATE manuscripts SET \
                status = '{STATUS_REVISION}', \
                revision_request = $2, \
                revision_count = revision_count + 1, \
                confirmed_at = NOW(), \
                updated_at = NOW() \
             WHERE id = $1 AND status = '{STATUS_PENDING}' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Manuscript>(&query)
            .bind(id)
            .bind(revision_request)
            .fetch_optional(pool)
            .await
    }

    /// Re-send a manuscript: fresh token, back to `pending`, new send
    /// timestamp, confirmation and reminder state cleared. The revision
    /// counter and group membership are deliberately untouched.
    pub async fn resend(
        pool: &PgPool,
        id: DbId,
        title: &str,
        content: &str,
        confirm_token: &str,
    ) -> Result<Option<Manuscript>, sqlx::Error> {
        let query = format!(
            "UPDATE manuscripts SET \
                title = $2, \
                content = $3, \
                confirm_token = $4, \
                status = '{STATUS_PENDING}', \
                sent_at = NOW(), \
                confirmed_at = NULL, \
                revision_request = NULL, \
                reminded_at = NULL, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Manuscript>(&query)
            .bind(id)
            .bind(title)
            .bind(content)
            .bind(confirm_token)
            .fetch_optional(pool)
            .await
    }

    /// Template change: retire `old_id` as `cancelled` and insert its
    /// replacement, bumping the new template's send counter, all in one
    /// transaction. The replacement inherits `input.revision_count` and
    /// carries no group id.
    ///
    /// A multi-row transaction removes the cancel-then-compensate dance a
    /// storage layer without one would need: either everything lands or the
    /// old manuscript is untouched.
    pub async fn change_template(
        pool: &PgPool,
        old_id: DbId,
        input: &NewManuscript,
    ) -> Result<Manuscript, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            format!(
                "UPDATE manuscripts SET status = '{STATUS_CANCELLED}', updated_at = NOW() \
                 WHERE id = $1"
            )
            .as_str(),
        )
        .bind(old_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO manuscripts \
                (client_id, template_id, title, content, confirm_token, group_id, revision_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let manuscript = sqlx::query_as::<_, Manuscript>(&query)
            .bind(input.client_id)
            .bind(input.template_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.confirm_token)
            .bind(&input.group_id)
            .bind(input.revision_count)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(template_id) = input.template_id {
            sqlx::query("UPDATE templates SET send_count = send_count + 1 WHERE id = $1")
                .bind(template_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(manuscript)
    }

    /// Staff detail patch. Only non-`None` fields are applied; moving the
    /// status to approved/revision stamps `confirmed_at`.
    pub async fn update_fields(
        pool: &PgPool,
        id: DbId,
        input: &UpdateManuscript,
    ) -> Result<Option<Manuscript>, sqlx::Error> {
        let query = format!(
            "UPDATE manuscripts SET \
                status = COALESCE($2, status), \
                title = COALESCE($3, title), \
                content = COALESCE($4, content), \
                revision_request = COALESCE($5, revision_request), \
                confirmed_at = CASE \
                    WHEN $2 IN ('{STATUS_APPROVED}', '{STATUS_REVISION}') THEN NOW() \
                    ELSE confirmed_at \
                END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Manuscript>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.revision_request)
            .fetch_optional(pool)
            .await
    }

    /// SLA sweep: auto-approve pending manuscripts sent before `cutoff`.
    /// Neither counters nor `confirmed_at` move; auto-approval is distinct
    /// from a manual approval. Returns the number of rows transitioned.
    pub async fn auto_approve_older_than(
        pool: &PgPool,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let query = format!(
            "UPDATE manuscripts SET \
                status = '{STATUS_AUTO_APPROVED}', \
                updated_at = NOW() \
             WHERE status = '{STATUS_PENDING}' AND sent_at < $1"
        );
        let result = sqlx::query(&query).bind(cutoff).execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Reminder sweep: pending manuscripts sent before `cutoff` that have
    /// not been reminded yet, joined with client contact details. One row
    /// per group so a client gets a single reminder per batch.
    pub async fn list_remindable(
        pool: &PgPool,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<RemindableManuscript>, sqlx::Error> {
        sqlx::query_as::<_, RemindableManuscript>(
            "SELECT DISTINCT ON (COALESCE(m.group_id, m.id::text)) \
                m.id, m.client_id, m.confirm_token, m.title, \
                c.name AS client_name, c.contact \
             FROM manuscripts m \
             JOIN clients c ON c.id = m.client_id \
             WHERE m.status = 'pending' \
               AND m.sent_at < $1 \
               AND m.reminded_at IS NULL \
             ORDER BY COALESCE(m.group_id, m.id::text), m.created_at ASC, m.id ASC",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }

    /// Record that a reminder went out for a manuscript (and its group
    /// siblings, so the sweep does not pick the batch up again).
    pub async fn mark_reminded(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE manuscripts SET reminded_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
                OR group_id = (SELECT group_id FROM manuscripts WHERE id = $1 AND group_id IS NOT NULL)",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
