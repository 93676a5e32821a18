//! Handlers for the `/reports` resource.
//!
//! Both endpoints take the same selectors; one returns the projected table
//! as JSON, the other as a CSV attachment.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, FixedOffset, Utc};
use maintrack_core::export::{csv_filename, to_csv};
use maintrack_core::report::ReportTable;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::reports::{generate, ReportQuery};
use crate::response::DataResponse;
use crate::state::AppState;

async fn build(state: &AppState, query: ReportQuery) -> AppResult<(ReportTable, DateTime<FixedOffset>)> {
    let offset = state.config.report_offset;
    let request = query.into_request(offset)?;
    let now = Utc::now().with_timezone(&offset);
    let table = generate(&state.store, &request, now).await?;
    Ok((table, now))
}

/// GET /api/v1/reports
///
/// `{title, columns, rows, message}`; `message` is set when `rows` is empty.
pub async fn get_report(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let (table, _) = build(&state, query).await?;
    Ok(Json(DataResponse { data: table }))
}

/// GET /api/v1/reports/export
///
/// The same report rendered as CSV, named after its kind and today's date in
/// the report zone.
pub async fn export_report(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let (table, now) = build(&state, query).await?;
    let filename = csv_filename(&table, now.date_naive());
    let body = to_csv(&table);

    tracing::info!(
        kind = table.kind.as_str(),
        rows = table.rows.len(),
        user_id = user.user_id,
        "Exported report",
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}
