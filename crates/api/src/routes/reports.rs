//! Route definitions for reports.

use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Report routes mounted at `/reports`.
///
/// ```text
/// GET /       -> get_report    (?kind&asset_id&preset&start&end&month&year)
/// GET /export -> export_report (same query, text/csv)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::get_report))
        .route("/export", get(reports::export_report))
}
