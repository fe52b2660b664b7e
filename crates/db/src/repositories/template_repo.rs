//! Repository for the `templates` table.

use inkflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::template::{CreateTemplate, Template, TemplateFilter, UpdateTemplate};

/// Column list for `templates` queries.
const COLUMNS: &str = "id, business_type, month, week, topic, title, content, \
     send_count, approve_count, is_active, created_at, updated_at";

/// Shared filter clause for list/count queries. Bind order:
/// $1 search, $2 business_type, $3 month.
const FILTER: &str = "is_active = true \
     AND ($1::text IS NULL OR title ILIKE '%' || $1 || '%' OR topic ILIKE '%' || $1 || '%') \
     AND ($2::text IS NULL OR business_type = $2) \
     AND ($3::integer IS NULL OR month = $3)";

/// Provides CRUD operations and counter updates for templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTemplate) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates (business_type, month, week, topic, title, content) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(&input.business_type)
            .bind(input.month)
            .bind(input.week)
            .bind(&input.topic)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a template by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a set of ids to active templates, preserving nothing about
    /// ids that do not resolve. Ordered by id for a deterministic fan-out.
    pub async fn find_active_many(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates \
             WHERE id = ANY($1) AND is_active = true \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List active templates matching the filter, best performers first.
    pub async fn list(
        pool: &PgPool,
        filter: &TemplateFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates \
             WHERE {FILTER} \
             ORDER BY approve_count DESC, send_count DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(&filter.search)
            .bind(&filter.business_type)
            .bind(filter.month)
            .bind(super::clamp_limit(limit))
            .bind(super::clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Count active templates matching the filter.
    pub async fn count(pool: &PgPool, filter: &TemplateFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM templates WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(&filter.search)
            .bind(&filter.business_type)
            .bind(filter.month)
            .fetch_one(pool)
            .await
    }

    /// Update a template. Only non-`None` fields are applied; the counters
    /// are not reachable from here.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                business_type = COALESCE($2, business_type), \
                month = COALESCE($3, month), \
                week = COALESCE($4, week), \
                topic = COALESCE($5, topic), \
                title = COALESCE($6, title), \
                content = COALESCE($7, content), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(&input.business_type)
            .bind(input.month)
            .bind(input.week)
            .bind(&input.topic)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a template. Returns `true` if a row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE templates SET is_active = false, updated_at = NOW() \
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically add `by` to a template's send counter. A single SQL
    /// increment so concurrent dispatches cannot lose updates.
    pub async fn increment_send_count(
        pool: &PgPool,
        id: DbId,
        by: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE templates SET send_count = send_count + $2 WHERE id = $1")
            .bind(id)
            .bind(by)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Atomically add `by` to a template's approve counter.
    pub async fn increment_approve_count(
        pool: &PgPool,
        id: DbId,
        by: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE templates SET approve_count = approve_count + $2 WHERE id = $1")
            .bind(id)
            .bind(by)
            .execute(pool)
            .await?;
        Ok(())
    }
}
