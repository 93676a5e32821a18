//! Repository for the `actions` table.

use sqlx::PgPool;
use maintrack_core::date_filter::DateFilter;
use maintrack_core::maintenance::{ActionStatus, Severity};
use maintrack_core::types::DbId;

use crate::models::action::{Action, CreateAction, UpdateAction};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, asset_id, action_type, severity, description, status, \
                       performed_by, performed_at, created_by, custom_fields, \
                       created_at, updated_at";

/// Shared `WHERE` clause: optional asset (`$1`) and inclusive
/// `performed_at` bounds (`$2`, `$3`).
const FILTER: &str = "($1::BIGINT IS NULL OR asset_id = $1)
               AND ($2::TIMESTAMPTZ IS NULL OR performed_at >= $2)
               AND ($3::TIMESTAMPTZ IS NULL OR performed_at <= $3)";

/// Provides CRUD operations for maintenance actions.
pub struct ActionRepo;

impl ActionRepo {
    /// Insert a new action, returning the created row.
    ///
    /// Missing severity, status, `performed_at` and `custom_fields` take
    /// their column defaults.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAction,
        created_by: &str,
    ) -> Result<Action, sqlx::Error> {
        let query = format!(
            "INSERT INTO actions
                (asset_id, action_type, severity, description, status,
                 performed_by, performed_at, created_by, custom_fields)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, NOW()), $8, COALESCE($9, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Action>(&query)
            .bind(input.asset_id)
            .bind(&input.action_type)
            .bind(input.severity.as_deref().unwrap_or(Severity::default().as_str()))
            .bind(input.description.as_deref())
            .bind(input.status.as_deref().unwrap_or(ActionStatus::default().as_str()))
            .bind(input.performed_by.as_deref())
            .bind(input.performed_at)
            .bind(created_by)
            .bind(input.custom_fields.as_ref())
            .fetch_one(pool)
            .await
    }

    /// Find an action by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Action>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actions WHERE id = $1");
        sqlx::query_as::<_, Action>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List actions, optionally for one asset and within `filter` on
    /// `performed_at`. Newest first.
    pub async fn list(
        pool: &PgPool,
        asset_id: Option<DbId>,
        filter: &DateFilter,
    ) -> Result<Vec<Action>, sqlx::Error> {
        let (start, end) = filter.bounds();
        let query = format!(
            "SELECT {COLUMNS} FROM actions
             WHERE {FILTER}
             ORDER BY performed_at DESC, id DESC"
        );
        sqlx::query_as::<_, Action>(&query)
            .bind(asset_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Count actions matching the same predicate as [`ActionRepo::list`].
    pub async fn count(
        pool: &PgPool,
        asset_id: Option<DbId>,
        filter: &DateFilter,
    ) -> Result<i64, sqlx::Error> {
        let (start, end) = filter.bounds();
        let query = format!("SELECT COUNT(*) FROM actions WHERE {FILTER}");
        let row: (i64,) = sqlx::query_as(&query)
            .bind(asset_id)
            .bind(start)
            .bind(end)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Update an action. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAction,
    ) -> Result<Option<Action>, sqlx::Error> {
        let query = format!(
            "UPDATE actions SET
                asset_id = COALESCE($2, asset_id),
                action_type = COALESCE($3, action_type),
                severity = COALESCE($4, severity),
                description = COALESCE($5, description),
                status = COALESCE($6, status),
                performed_by = COALESCE($7, performed_by),
                performed_at = COALESCE($8, performed_at),
                custom_fields = COALESCE($9, custom_fields)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Action>(&query)
            .bind(id)
            .bind(input.asset_id)
            .bind(input.action_type.as_deref())
            .bind(input.severity.as_deref())
            .bind(input.description.as_deref())
            .bind(input.status.as_deref())
            .bind(input.performed_by.as_deref())
            .bind(input.performed_at)
            .bind(input.custom_fields.as_ref())
            .fetch_optional(pool)
            .await
    }

    /// Delete an action by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM actions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
