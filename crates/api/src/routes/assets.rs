//! Route definitions for the asset registry.
//!
//! All routes are mounted under `/assets`.

use axum::routing::get;
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Asset routes mounted at `/assets`.
///
/// ```text
/// GET    /       -> list_assets (?include_counts&start_date&end_date)
/// POST   /       -> create_asset (manager)
/// GET    /health -> asset_health (?start_date&end_date)
/// GET    /{id}   -> get_asset
/// PUT    /{id}   -> update_asset (manager)
/// DELETE /{id}   -> delete_asset (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route("/health", get(assets::asset_health))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
}
