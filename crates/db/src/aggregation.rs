//! Aggregation engine: per-asset child counts inside a report window.

use std::sync::Arc;

use futures::{StreamExt, TryStreamExt};
use maintrack_core::date_filter::DateFilter;
use maintrack_core::report_window::ReportWindow;
use serde::Serialize;

use crate::models::asset::Asset;
use crate::store::{ChildKind, EntityStore, StoreError};

/// Assets whose counts are in flight at once.
const MAX_CONCURRENT_ASSETS: usize = 8;

/// An asset with the number of actions and failures in the window.
///
/// Computed on demand; never cached or persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedAssetRow {
    #[serde(flatten)]
    pub asset: Asset,
    pub actions_count: i64,
    pub failures_count: i64,
}

/// Computes [`AggregatedAssetRow`]s from an [`EntityStore`].
#[derive(Clone)]
pub struct AggregationEngine {
    store: Arc<dyn EntityStore>,
}

impl AggregationEngine {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// One row per asset, in the store's asset order.
    ///
    /// Actions are matched on `performed_at`, failures on `detected_at`.
    /// The first store error aborts the whole aggregation.
    pub async fn aggregate(&self, window: &ReportWindow) -> Result<Vec<AggregatedAssetRow>, StoreError> {
        let filter = DateFilter::from_window(window);
        let assets = self.store.list_assets().await?;
        let asset_count = assets.len();

        let rows: Vec<AggregatedAssetRow> = futures::stream::iter(assets)
            .map(|asset| self.count_children(asset, filter))
            .buffered(MAX_CONCURRENT_ASSETS)
            .try_collect()
            .await?;

        tracing::debug!(
            preset = window.preset.as_str(),
            assets = asset_count,
            "Aggregated asset counts",
        );
        Ok(rows)
    }

    async fn count_children(
        &self,
        asset: Asset,
        filter: DateFilter,
    ) -> Result<AggregatedAssetRow, StoreError> {
        let (actions_count, failures_count) = futures::try_join!(
            self.store.count(ChildKind::Action, asset.id, &filter),
            self.store.count(ChildKind::Failure, asset.id, &filter),
        )?;
        Ok(AggregatedAssetRow {
            asset,
            actions_count,
            failures_count,
        })
    }
}
