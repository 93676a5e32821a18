//! Handlers for the `/failures` resource.
//!
//! Any authenticated user may report, edit or remove a failure.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use maintrack_core::error::CoreError;
use maintrack_core::maintenance::validate_failure_fields;
use maintrack_core::types::DbId;
use maintrack_db::models::failure::{CreateFailure, UpdateFailure};
use maintrack_db::repositories::FailureRepo;
use validator::Validate;

use super::ensure_asset_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Failure",
        id,
    })
}

/// GET /api/v1/failures
pub async fn list_failures(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let filter = range.to_filter(state.config.report_offset)?;
    let failures = FailureRepo::list(&state.pool, None, &filter).await?;
    Ok(Json(DataResponse { data: failures }))
}

/// GET /api/v1/failures/asset/{asset_id}
///
/// Failures of one asset, newest `detected_at` first.
pub async fn list_by_asset(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(asset_id): Path<DbId>,
    Query(range): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let filter = range.to_filter(state.config.report_offset)?;
    ensure_asset_exists(&state.pool, asset_id).await?;
    let failures = FailureRepo::list(&state.pool, Some(asset_id), &filter).await?;
    Ok(Json(DataResponse { data: failures }))
}

/// GET /api/v1/failures/{id}
pub async fn get_failure(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let failure = FailureRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: failure }))
}

/// POST /api/v1/failures
pub async fn create_failure(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateFailure>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_failure_fields(input.severity.as_deref(), input.status.as_deref())?;
    ensure_asset_exists(&state.pool, input.asset_id).await?;

    let failure = FailureRepo::create(&state.pool, &input).await?;

    tracing::info!(
        failure_id = failure.id,
        asset_id = failure.asset_id,
        severity = %failure.severity,
        user_id = user.user_id,
        "Failure reported",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: failure })))
}

/// PUT /api/v1/failures/{id}
pub async fn update_failure(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFailure>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_failure_fields(input.severity.as_deref(), input.status.as_deref())?;
    if let Some(asset_id) = input.asset_id {
        ensure_asset_exists(&state.pool, asset_id).await?;
    }

    let failure = FailureRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(failure_id = id, status = %failure.status, user_id = user.user_id, "Failure updated");

    Ok(Json(DataResponse { data: failure }))
}

/// DELETE /api/v1/failures/{id}
pub async fn delete_failure(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !FailureRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(failure_id = id, user_id = user.user_id, "Failure deleted");
    Ok(StatusCode::NO_CONTENT)
}
