use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Document routes mounted at `/documents`.
///
/// ```text
/// POST   /upload           -> upload_document (technician, multipart)
/// GET    /asset/{asset_id} -> list_by_asset
/// DELETE /{id}             -> delete_document (technician)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(documents::upload_document))
        .route("/asset/{asset_id}", get(documents::list_by_asset))
        .route("/{id}", delete(documents::delete_document))
}
