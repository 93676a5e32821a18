//! Document attachment model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use maintrack_core::types::{DbId, Timestamp};

/// Document type used when an upload does not name one.
pub const DEFAULT_DOCUMENT_TYPE: &str = "other";

/// A row from the `documents` table. The file bytes live in file storage
/// at `file_path`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub asset_id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub document_type: String,
    pub file_path: String,
    pub uploaded_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting document metadata after the file has been stored.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub asset_id: DbId,
    pub name: String,
    pub document_type: String,
    pub file_path: String,
}
