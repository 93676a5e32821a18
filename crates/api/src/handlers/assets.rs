//! Handlers for the `/assets` resource.
//!
//! Plain listings read the pool directly; listings with counts and the
//! health overview go through the [`AggregationEngine`] over the report
//! store.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use maintrack_core::date_filter::DateFilter;
use maintrack_core::deletion::{check_asset_deletion, AssetDeletePolicy};
use maintrack_core::error::CoreError;
use maintrack_core::report::EMPTY_REPORT_MESSAGE;
use maintrack_core::types::DbId;
use maintrack_db::aggregation::{AggregatedAssetRow, AggregationEngine};
use maintrack_db::models::asset::{AssetDetail, CreateAsset, UpdateAsset};
use maintrack_db::repositories::{ActionRepo, AssetRepo, DocumentRepo, FailureRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireManager};
use crate::query::{AssetListParams, DateRangeParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `GET /assets/health`.
#[derive(Debug, Serialize)]
pub struct AssetHealthOverview {
    pub assets: Vec<AggregatedAssetRow>,
    /// Set when no asset exists.
    pub message: Option<&'static str>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// GET /api/v1/assets
///
/// List assets, newest first. With `include_counts=true` each asset carries
/// its action and failure counts within `start_date..end_date`.
pub async fn list_assets(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<AssetListParams>,
) -> AppResult<Response> {
    if params.include_counts {
        let window = params.range().to_window(state.config.report_offset)?;
        let rows = AggregationEngine::new(Arc::clone(&state.store))
            .aggregate(&window)
            .await?;
        return Ok(Json(DataResponse { data: rows }).into_response());
    }

    let assets = AssetRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: assets }).into_response())
}

/// GET /api/v1/assets/health
///
/// Every asset with its counts within the optional date range.
pub async fn asset_health(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let window = range.to_window(state.config.report_offset)?;
    let assets = AggregationEngine::new(Arc::clone(&state.store))
        .aggregate(&window)
        .await?;
    let message = assets.is_empty().then_some(EMPTY_REPORT_MESSAGE);

    Ok(Json(DataResponse {
        data: AssetHealthOverview { assets, message },
    }))
}

/// GET /api/v1/assets/{id}
///
/// The asset with all of its actions and failures, newest first.
pub async fn get_asset(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }))?;

    let unbounded = DateFilter::Unbounded;
    let (actions, failures) = tokio::try_join!(
        ActionRepo::list(&state.pool, Some(id), &unbounded),
        FailureRepo::list(&state.pool, Some(id), &unbounded),
    )?;

    Ok(Json(DataResponse {
        data: AssetDetail {
            asset,
            actions,
            failures,
        },
    }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/assets
///
/// Register a new asset. Manager or admin.
pub async fn create_asset(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateAsset>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let asset = AssetRepo::create(&state.pool, &input).await?;

    tracing::info!(
        asset_id = asset.id,
        code = %asset.code,
        user_id = user.user_id,
        "Asset created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// PUT /api/v1/assets/{id}
///
/// Partial update. Manager or admin.
pub async fn update_asset(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let asset = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }))?;

    tracing::info!(asset_id = id, user_id = user.user_id, "Asset updated");

    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
///
/// Admin only. Under `restrict` an asset that still has actions, failures
/// or documents is refused with 409; under `cascade` they are removed along
/// with the asset.
pub async fn delete_asset(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let policy = state.config.asset_delete_policy;
    let dependents = AssetRepo::count_dependents(&state.pool, id).await?;
    check_asset_deletion(policy, id, dependents)?;

    let deleted = match policy {
        AssetDeletePolicy::Restrict => AssetRepo::delete(&state.pool, id).await?,
        AssetDeletePolicy::Cascade => {
            let documents = DocumentRepo::list_by_asset(&state.pool, id).await?;
            let deleted = AssetRepo::delete_cascade(&state.pool, id).await?;
            for doc in documents {
                if let Err(e) = state.files.remove(&doc.file_path).await {
                    tracing::warn!(document_id = doc.id, error = %e, "Failed to remove stored file");
                }
            }
            deleted
        }
    };

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }));
    }

    tracing::info!(
        asset_id = id,
        policy = policy.as_str(),
        actions = dependents.actions,
        failures = dependents.failures,
        documents = dependents.documents,
        user_id = admin.user_id,
        "Asset deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
