//! Repository for the `clients` table.

use inkflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{Client, ClientFilter, CreateClient, UpdateClient};

/// Column list for `clients` queries.
const COLUMNS: &str = "id, name, region, business_type, main_service, differentiator, \
     contact, memo, is_active, client_type, manager, created_at, updated_at";

/// Shared filter clause for list/count queries. Bind order:
/// $1 search, $2 business_type, $3 is_active, $4 client_type, $5 manager.
const FILTER: &str = "($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR region ILIKE '%' || $1 || '%') \
     AND ($2::text IS NULL OR business_type = $2) \
     AND ($3::boolean IS NULL OR is_active = $3) \
     AND ($4::text IS NULL OR client_type = $4) \
     AND ($5::text IS NULL OR manager = $5)";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients \
                (name, region, business_type, main_service, differentiator, contact, memo, client_type, manager) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'template'), $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.region)
            .bind(&input.business_type)
            .bind(&input.main_service)
            .bind(&input.differentiator)
            .bind(&input.contact)
            .bind(&input.memo)
            .bind(&input.client_type)
            .bind(&input.manager)
            .fetch_one(pool)
            .await
    }

    /// Find a client by ID, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active client by ID.
    pub async fn find_active_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a set of ids to active clients. Ids that do not resolve are
    /// silently dropped; callers decide whether an empty result is an error.
    pub async fn find_active_many(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients \
             WHERE id = ANY($1) AND is_active = true \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List clients matching the filter, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &ClientFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients \
             WHERE {FILTER} \
             ORDER BY created_at DESC \
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&filter.search)
            .bind(&filter.business_type)
            .bind(filter.is_active)
            .bind(&filter.client_type)
            .bind(&filter.manager)
            .bind(super::clamp_limit(limit))
            .bind(super::clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Count clients matching the filter.
    pub async fn count(pool: &PgPool, filter: &ClientFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM clients WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(&filter.search)
            .bind(&filter.business_type)
            .bind(filter.is_active)
            .bind(&filter.client_type)
            .bind(&filter.manager)
            .fetch_one(pool)
            .await
    }

    /// Update a client. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET \
                name = COALESCE($2, name), \
                region = COALESCE($3, region), \
                business_type = COALESCE($4, business_type), \
                main_service = COALESCE($5, main_service), \
                differentiator = COALESCE($6, differentiator), \
                contact = COALESCE($7, contact), \
                memo = COALESCE($8, memo), \
                client_type = COALESCE($9, client_type), \
                manager = COALESCE($10, manager), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.region)
            .bind(&input.business_type)
            .bind(&input.main_service)
            .bind(&input.differentiator)
            .bind(&input.contact)
            .bind(&input.memo)
            .bind(&input.client_type)
            .bind(&input.manager)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a client. Returns `true` if a row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clients SET is_active = false, updated_at = NOW() \
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
