//! Repository for the `failures` table.

use sqlx::PgPool;
use maintrack_core::date_filter::DateFilter;
use maintrack_core::maintenance::{Severity, DEFAULT_FAILURE_STATUS};
use maintrack_core::types::DbId;

use crate::models::failure::{CreateFailure, Failure, UpdateFailure};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, asset_id, failure_type, description, severity, status, \
                       detected_at, resolved_at, resolution_details, resolved_by, \
                       reported_by, custom_fields, created_at, updated_at";

/// Shared `WHERE` clause: optional asset (`$1`) and inclusive
/// `detected_at` bounds (`$2`, `$3`).
const FILTER: &str = "($1::BIGINT IS NULL OR asset_id = $1)
               AND ($2::TIMESTAMPTZ IS NULL OR detected_at >= $2)
               AND ($3::TIMESTAMPTZ IS NULL OR detected_at <= $3)";

/// Provides CRUD operations for failure records.
pub struct FailureRepo;

impl FailureRepo {
    /// Insert a new failure, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateFailure) -> Result<Failure, sqlx::Error> {
        let query = format!(
            "INSERT INTO failures
                (asset_id, failure_type, description, severity, status, detected_at,
                 resolved_at, resolution_details, resolved_by, reported_by, custom_fields)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Failure>(&query)
            .bind(input.asset_id)
            .bind(&input.failure_type)
            .bind(input.description.as_deref())
            .bind(input.severity.as_deref().unwrap_or(Severity::default().as_str()))
            .bind(input.status.as_deref().unwrap_or(DEFAULT_FAILURE_STATUS))
            .bind(input.detected_at)
            .bind(input.resolved_at)
            .bind(input.resolution_details.as_deref())
            .bind(input.resolved_by.as_deref())
            .bind(input.reported_by.as_deref())
            .bind(input.custom_fields.as_ref())
            .fetch_one(pool)
            .await
    }

    /// Find a failure by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Failure>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM failures WHERE id = $1");
        sqlx::query_as::<_, Failure>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List failures, optionally for one asset and within `filter` on
    /// `detected_at`. Newest first.
    pub async fn list(
        pool: &PgPool,
        asset_id: Option<DbId>,
        filter: &DateFilter,
    ) -> Result<Vec<Failure>, sqlx::Error> {
        let (start, end) = filter.bounds();
        let query = format!(
            "SELECT {COLUMNS} FROM failures
             WHERE {FILTER}
             ORDER BY detected_at DESC, id DESC"
        );
        sqlx::query_as::<_, Failure>(&query)
            .bind(asset_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Count failures matching the same predicate as [`FailureRepo::list`].
    pub async fn count(
        pool: &PgPool,
        asset_id: Option<DbId>,
        filter: &DateFilter,
    ) -> Result<i64, sqlx::Error> {
        let (start, end) = filter.bounds();
        let query = format!("SELECT COUNT(*) FROM failures WHERE {FILTER}");
        let row: (i64,) = sqlx::query_as(&query)
            .bind(asset_id)
            .bind(start)
            .bind(end)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Update a failure. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFailure,
    ) -> Result<Option<Failure>, sqlx::Error> {
        let query = format!(
            "UPDATE failures SET
                asset_id = COALESCE($2, asset_id),
                failure_type = COALESCE($3, failure_type),
                description = COALESCE($4, description),
                severity = COALESCE($5, severity),
                status = COALESCE($6, status),
                detected_at = COALESCE($7, detected_at),
                resolved_at = COALESCE($8, resolved_at),
                resolution_details = COALESCE($9, resolution_details),
                resolved_by = COALESCE($10, resolved_by),
                reported_by = COALESCE($11, reported_by),
                custom_fields = COALESCE($12, custom_fields)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Failure>(&query)
            .bind(id)
            .bind(input.asset_id)
            .bind(input.failure_type.as_deref())
            .bind(input.description.as_deref())
            .bind(input.severity.as_deref())
            .bind(input.status.as_deref())
            .bind(input.detected_at)
            .bind(input.resolved_at)
            .bind(input.resolution_details.as_deref())
            .bind(input.resolved_by.as_deref())
            .bind(input.reported_by.as_deref())
            .bind(input.custom_fields.as_ref())
            .fetch_optional(pool)
            .await
    }

    /// Delete a failure by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM failures WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
