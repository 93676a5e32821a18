//! Repository for the `documents` table.

use sqlx::PgPool;
use maintrack_core::types::DbId;

use crate::models::document::{CreateDocument, Document};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, asset_id, name, document_type, file_path, \
                       uploaded_at, created_at, updated_at";

/// Provides CRUD operations for document metadata.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert document metadata, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateDocument) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (asset_id, name, document_type, file_path)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(input.asset_id)
            .bind(&input.name)
            .bind(&input.document_type)
            .bind(&input.file_path)
            .fetch_one(pool)
            .await
    }

    /// Find a document by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the documents attached to an asset, newest upload first.
    pub async fn list_by_asset(pool: &PgPool, asset_id: DbId) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents WHERE asset_id = $1 ORDER BY uploaded_at DESC, id DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }

    /// Delete document metadata by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
