//! Dashboard summary read models.

use serde::Serialize;
use sqlx::FromRow;

/// A `(label, count)` pair used in dashboard breakdowns.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

/// Totals shown on the dashboard landing page.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_assets: i64,
    pub total_actions: i64,
    pub total_failures: i64,
    /// Failures whose status is neither `Resolved` nor `Closed`.
    pub unresolved_failures: i64,
    pub failures_by_severity: Vec<LabelCount>,
    pub actions_by_type: Vec<LabelCount>,
}
