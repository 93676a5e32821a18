//! Handlers for the `/actions` resource (maintenance actions).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use maintrack_core::error::CoreError;
use maintrack_core::maintenance::validate_action_fields;
use maintrack_core::types::DbId;
use maintrack_db::models::action::{CreateAction, UpdateAction};
use maintrack_db::repositories::ActionRepo;
use validator::Validate;

use super::ensure_asset_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager, RequireTechnician};
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Action",
        id,
    })
}

/// GET /api/v1/actions
///
/// All actions, newest `performed_at` first, optionally within
/// `start_date..end_date`.
pub async fn list_actions(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let filter = range.to_filter(state.config.report_offset)?;
    let actions = ActionRepo::list(&state.pool, None, &filter).await?;
    Ok(Json(DataResponse { data: actions }))
}

/// GET /api/v1/actions/asset/{asset_id}
pub async fn list_by_asset(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(asset_id): Path<DbId>,
    Query(range): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let filter = range.to_filter(state.config.report_offset)?;
    ensure_asset_exists(&state.pool, asset_id).await?;
    let actions = ActionRepo::list(&state.pool, Some(asset_id), &filter).await?;
    Ok(Json(DataResponse { data: actions }))
}

/// GET /api/v1/actions/{id}
pub async fn get_action(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let action = ActionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: action }))
}

/// POST /api/v1/actions
///
/// Record a maintenance action. Technician, manager or admin. The caller's
/// username is stored as `created_by`.
pub async fn create_action(
    RequireTechnician(user): RequireTechnician,
    State(state): State<AppState>,
    Json(input): Json<CreateAction>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_action_fields(
        Some(&input.action_type),
        input.severity.as_deref(),
        input.status.as_deref(),
    )?;
    ensure_asset_exists(&state.pool, input.asset_id).await?;

    let action = ActionRepo::create(&state.pool, &input, &user.username).await?;

    tracing::info!(
        action_id = action.id,
        asset_id = action.asset_id,
        action_type = %action.action_type,
        user_id = user.user_id,
        "Action recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: action })))
}

/// PUT /api/v1/actions/{id}
pub async fn update_action(
    RequireTechnician(user): RequireTechnician,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAction>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_action_fields(
        input.action_type.as_deref(),
        input.severity.as_deref(),
        input.status.as_deref(),
    )?;
    if let Some(asset_id) = input.asset_id {
        ensure_asset_exists(&state.pool, asset_id).await?;
    }

    let action = ActionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(action_id = id, user_id = user.user_id, "Action updated");

    Ok(Json(DataResponse { data: action }))
}

/// DELETE /api/v1/actions/{id}
///
/// Manager or admin.
pub async fn delete_action(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ActionRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(action_id = id, user_id = user.user_id, "Action deleted");
    Ok(StatusCode::NO_CONTENT)
}
