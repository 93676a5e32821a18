use axum::routing::get;
use axum::Router;

use crate::handlers::actions;
use crate::state::AppState;

/// Maintenance action routes mounted at `/actions`.
///
/// ```text
/// GET    /                 -> list_actions (?start_date&end_date)
/// POST   /                 -> create_action (technician)
/// GET    /asset/{asset_id} -> list_by_asset (?start_date&end_date)
/// GET    /{id}             -> get_action
/// PUT    /{id}             -> update_action (technician)
/// DELETE /{id}             -> delete_action (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(actions::list_actions).post(actions::create_action))
        .route("/asset/{asset_id}", get(actions::list_by_asset))
        .route(
            "/{id}",
            get(actions::get_action)
                .put(actions::update_action)
                .delete(actions::delete_action),
        )
}
