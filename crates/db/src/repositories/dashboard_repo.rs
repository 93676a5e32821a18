//! Read-only aggregate queries backing the dashboard summary.

use sqlx::PgPool;

use crate::models::dashboard::{DashboardSummary, LabelCount};

/// Provides the dashboard summary query.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Compute totals and breakdowns across all assets.
    pub async fn summary(pool: &PgPool) -> Result<DashboardSummary, sqlx::Error> {
        let (total_assets, total_actions, total_failures, unresolved_failures): (
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM assets),
                (SELECT COUNT(*) FROM actions),
                (SELECT COUNT(*) FROM failures),
                (SELECT COUNT(*) FROM failures WHERE status NOT IN ('Resolved', 'Closed'))",
        )
        .fetch_one(pool)
        .await?;

        let failures_by_severity = sqlx::query_as::<_, LabelCount>(
            "SELECT severity AS label, COUNT(*) AS count
             FROM failures GROUP BY severity ORDER BY count DESC, label",
        )
        .fetch_all(pool)
        .await?;

        let actions_by_type = sqlx::query_as::<_, LabelCount>(
            "SELECT action_type AS label, COUNT(*) AS count
             FROM actions GROUP BY action_type ORDER BY count DESC, label",
        )
        .fetch_all(pool)
        .await?;

        Ok(DashboardSummary {
            total_assets,
            total_actions,
            total_failures,
            unresolved_failures,
            failures_by_severity,
            actions_by_type,
        })
    }
}
