pub mod actions;
pub mod assets;
pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod failures;
pub mod health;
pub mod reports;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
///
/// /users                                           list (admin only)
/// /users/me                                        current profile
/// /users/{id}                                      get, update, delete (admin only)
///
/// /assets                                          list (?include_counts), create
/// /assets/health                                   aggregated counts + message
/// /assets/{id}                                     get, update, delete
///
/// /actions                                         list, create
/// /actions/asset/{asset_id}                        list for one asset
/// /actions/{id}                                    get, update, delete
///
/// /failures                                        list, create
/// /failures/asset/{asset_id}                       list for one asset
/// /failures/{id}                                   get, update, delete
///
/// /documents/upload                                upload (multipart)
/// /documents/asset/{asset_id}                      list for one asset
/// /documents/{id}                                  delete
///
/// /dashboard/summary                               totals and breakdowns
///
/// /reports                                         projected report (JSON)
/// /reports/export                                  projected report (CSV)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Registration and login.
        .nest("/auth", auth::router())
        // User profiles and admin user management.
        .nest("/users", users::router())
        // Asset registry, with aggregated counts.
        .nest("/assets", assets::router())
        // Maintenance actions.
        .nest("/actions", actions::router())
        // Failure records.
        .nest("/failures", failures::router())
        // Document attachments.
        .nest("/documents", documents::router())
        // Landing page totals.
        .nest("/dashboard", dashboard::router())
        // Report tables and CSV export.
        .nest("/reports", reports::router())
}
