use axum::routing::get;
use axum::Router;

use crate::handlers::failures;
use crate::state::AppState;

/// Failure routes mounted at `/failures`.
///
/// ```text
/// GET    /                 -> list_failures (?start_date&end_date)
/// POST   /                 -> create_failure
/// GET    /asset/{asset_id} -> list_by_asset (?start_date&end_date)
/// GET    /{id}             -> get_failure
/// PUT    /{id}             -> update_failure
/// DELETE /{id}             -> delete_failure
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(failures::list_failures).post(failures::create_failure))
        .route("/asset/{asset_id}", get(failures::list_by_asset))
        .route(
            "/{id}",
            get(failures::get_failure)
                .put(failures::update_failure)
                .delete(failures::delete_failure),
        )
}
