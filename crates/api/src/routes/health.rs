//! Liveness endpoint, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every probe passed, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    /// CRUD pool reachable.
    pub db_healthy: bool,
    /// Report store reachable.
    pub store_healthy: bool,
}

/// GET /health
///
/// Always 200; callers read `status`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (db, store) = tokio::join!(
        maintrack_db::health_check(&state.pool),
        state.store.ping(),
    );
    let db_healthy = db.is_ok();
    let store_healthy = store.is_ok();

    Json(HealthResponse {
        status: if db_healthy && store_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        store_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
