use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User routes mounted at `/users`.
///
/// ```text
/// GET    /     -> list_users (admin only)
/// GET    /me   -> me
/// GET    /{id} -> get_user (admin only)
/// PUT    /{id} -> update_user (admin only)
/// DELETE /{id} -> delete_user (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/me", get(users::me))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}
