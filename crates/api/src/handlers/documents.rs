//! Handlers for the `/documents` resource.
//!
//! Uploads are `multipart/form-data` with a `document` file field plus
//! `asset_id` and optional `name` / `type` text fields. Bytes go to the
//! [`FileStorage`](crate::storage::FileStorage); metadata to `documents`.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use maintrack_core::error::CoreError;
use maintrack_core::types::DbId;
use maintrack_db::models::document::{CreateDocument, DEFAULT_DOCUMENT_TYPE};
use maintrack_db::repositories::DocumentRepo;

use super::ensure_asset_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireTechnician};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage::{is_allowed_mime, StorageError, DOCUMENT_FIELD};

/// The file part of an upload.
struct UploadedFile {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// POST /api/v1/documents/upload
///
/// Store an uploaded file and record it against an asset. Technician,
/// manager or admin.
pub async fn upload_document(
    RequireTechnician(user): RequireTechnician,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut file: Option<UploadedFile> = None;
    let mut asset_id: Option<String> = None;
    let mut name: Option<String> = None;
    let mut document_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            DOCUMENT_FIELD => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "asset_id" | "name" | "type" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let slot = match field_name.as_str() {
                    "asset_id" => &mut asset_id,
                    "name" => &mut name,
                    _ => &mut document_type,
                };
                *slot = Some(text);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| {
        AppError::BadRequest(format!("Missing required '{DOCUMENT_FIELD}' field"))
    })?;
    let asset_id: DbId = asset_id
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| CoreError::Validation("asset_id is required".into()))?
        .parse()
        .map_err(|_| CoreError::Validation("asset_id must be an integer".into()))?;

    if file.bytes.len() > state.config.max_upload_bytes {
        return Err(AppError::Core(CoreError::Validation(format!(
            "File exceeds the {} byte upload limit",
            state.config.max_upload_bytes
        ))));
    }
    if !is_allowed_mime(&file.content_type) {
        return Err(StorageError::UnsupportedType(file.content_type).into());
    }
    ensure_asset_exists(&state.pool, asset_id).await?;

    let file_path = state.files.store(&file.file_name, &file.bytes).await?;

    let input = CreateDocument {
        asset_id,
        name: non_blank(name).unwrap_or_else(|| file.file_name.clone()),
        document_type: non_blank(document_type).unwrap_or_else(|| DEFAULT_DOCUMENT_TYPE.into()),
        file_path,
    };

    let document = match DocumentRepo::create(&state.pool, &input).await {
        Ok(doc) => doc,
        Err(e) => {
            if let Err(cleanup) = state.files.remove(&input.file_path).await {
                tracing::warn!(path = %input.file_path, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        document_id = document.id,
        asset_id,
        size = file.bytes.len(),
        user_id = user.user_id,
        "Document uploaded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/v1/documents/asset/{asset_id}
pub async fn list_by_asset(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(asset_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_asset_exists(&state.pool, asset_id).await?;
    let documents = DocumentRepo::list_by_asset(&state.pool, asset_id).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// DELETE /api/v1/documents/{id}
///
/// Removes the metadata row, then the stored file.
pub async fn delete_document(
    RequireTechnician(user): RequireTechnician,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))?;

    DocumentRepo::delete(&state.pool, id).await?;
    if let Err(e) = state.files.remove(&document.file_path).await {
        tracing::warn!(document_id = id, error = %e, "Failed to remove stored file");
    }

    tracing::info!(document_id = id, user_id = user.user_id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
