//! Repository for the `assets` table.

use sqlx::PgPool;
use maintrack_core::deletion::AssetDependents;
use maintrack_core::types::DbId;

use crate::models::asset::{Asset, CreateAsset, UpdateAsset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, name, location, system, specifications, \
                       custom_fields, created_at, updated_at";

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset, returning the created row.
    ///
    /// A duplicate `code` fails with a unique violation on `uq_assets_code`.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (code, name, location, system, specifications, custom_fields)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.location.as_deref())
            .bind(input.system.as_deref())
            .bind(input.specifications.as_deref())
            .bind(input.custom_fields.as_ref())
            .fetch_one(pool)
            .await
    }

    /// Find an asset by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all assets, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Asset>(&query).fetch_all(pool).await
    }

    /// Whether an asset with the given ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM assets WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Update an asset. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                location = COALESCE($4, location),
                system = COALESCE($5, system),
                specifications = COALESCE($6, specifications),
                custom_fields = COALESCE($7, custom_fields)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(input.code.as_deref())
            .bind(input.name.as_deref())
            .bind(input.location.as_deref())
            .bind(input.system.as_deref())
            .bind(input.specifications.as_deref())
            .bind(input.custom_fields.as_ref())
            .fetch_optional(pool)
            .await
    }

    /// Count the actions, failures and documents referencing an asset.
    pub async fn count_dependents(pool: &PgPool, id: DbId) -> Result<AssetDependents, sqlx::Error> {
        let (actions, failures, documents): (i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM actions WHERE asset_id = $1),
                (SELECT COUNT(*) FROM failures WHERE asset_id = $1),
                (SELECT COUNT(*) FROM documents WHERE asset_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(AssetDependents {
            actions,
            failures,
            documents,
        })
    }

    /// Delete a childless asset. Returns `true` if a row was deleted.
    ///
    /// Fails with a foreign key violation if children still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an asset and every row referencing it in one transaction.
    /// Returns `true` if the asset existed.
    pub async fn delete_cascade(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        for table in ["documents", "actions", "failures"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE asset_id = $1"))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
