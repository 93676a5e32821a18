//! Report service.
//!
//! Validates report selectors, resolves the date window, reads from the
//! [`EntityStore`] (or the [`AggregationEngine`]), converts rows into
//! projected records and hands them to the [`Projector`]. Nothing is
//! written; projection only starts once every store call has succeeded.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use maintrack_core::date_filter::DateFilter;
use maintrack_core::error::CoreError;
use maintrack_core::report::{
    actions_by_month_title, failures_title, ActionRecord, AssetHealthRecord, AssetRef,
    FailureRecord, Projector, ReportKind, ReportRecord, ReportTable, ASSET_HEALTH_TITLE,
};
use maintrack_core::report_window::{
    in_calendar_month, parse_optional_wire_date, resolve, validate_month, DatePreset,
    ReportWindow,
};
use maintrack_core::types::DbId;
use maintrack_db::aggregation::{AggregatedAssetRow, AggregationEngine};
use maintrack_db::models::action::Action;
use maintrack_db::models::asset::Asset;
use maintrack_db::models::failure::Failure;
use maintrack_db::store::{ChildQuery, EntityStore};
use serde::Deserialize;

use crate::error::AppResult;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Raw `?kind=&asset_id=&preset=&start=&end=&month=&year=` selectors.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReportQuery {
    pub kind: Option<String>,
    pub asset_id: Option<DbId>,
    pub preset: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Preset plus optional custom bounds, not yet resolved against a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSelector {
    pub preset: DatePreset,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl WindowSelector {
    pub fn resolve(&self, now: DateTime<FixedOffset>) -> ReportWindow {
        resolve(self.preset, self.start, self.end, now)
    }
}

/// A validated report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRequest {
    FailuresByAsset { asset_id: DbId, window: WindowSelector },
    ActionsByMonth { month: u32, year: i32 },
    AssetHealth { window: WindowSelector },
}

impl ReportRequest {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRequest::FailuresByAsset { .. } => ReportKind::FailuresByAsset,
            ReportRequest::ActionsByMonth { .. } => ReportKind::ActionsByMonth,
            ReportRequest::AssetHealth { .. } => ReportKind::AssetHealth,
        }
    }
}

impl ReportQuery {
    /// Validate the selectors for the requested kind.
    ///
    /// Without a `preset`, the window is `custom` when `start` or `end` is
    /// given and `all_time` otherwise.
    pub fn into_request(self, offset: FixedOffset) -> Result<ReportRequest, CoreError> {
        let kind = self
            .kind
            .as_deref()
            .ok_or_else(|| CoreError::Validation("Report kind is required".into()))
            .and_then(ReportKind::parse)?;

        match kind {
            ReportKind::FailuresByAsset => {
                let asset_id = self.asset_id.ok_or_else(|| {
                    CoreError::Validation("asset_id is required for failures_by_asset".into())
                })?;
                Ok(ReportRequest::FailuresByAsset {
                    asset_id,
                    window: self.window(offset)?,
                })
            }
            ReportKind::ActionsByMonth => match (self.month, self.year) {
                (Some(month), Some(year)) => {
                    validate_month(month)?;
                    Ok(ReportRequest::ActionsByMonth { month, year })
                }
                _ => Err(CoreError::Validation(
                    "month and year are required for actions_by_month".into(),
                )),
            },
            ReportKind::AssetHealth => Ok(ReportRequest::AssetHealth {
                window: self.window(offset)?,
            }),
        }
    }

    fn window(&self, offset: FixedOffset) -> Result<WindowSelector, CoreError> {
        let start = parse_optional_wire_date(self.start.as_deref(), offset)?;
        let end = parse_optional_wire_date(self.end.as_deref(), offset)?;
        let preset = match self.preset.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => DatePreset::parse(p)?,
            _ if start.is_some() || end.is_some() => DatePreset::Custom,
            _ => DatePreset::AllTime,
        };
        Ok(WindowSelector { preset, start, end })
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Build the report described by `request` as of `now`.
///
/// `now`'s offset is the report zone: it sets day and month boundaries and
/// the display zone of formatted timestamps.
pub async fn generate(
    store: &Arc<dyn EntityStore>,
    request: &ReportRequest,
    now: DateTime<FixedOffset>,
) -> AppResult<ReportTable> {
    let offset = *now.offset();
    let kind = request.kind();

    let (title, records) = match *request {
        ReportRequest::FailuresByAsset { asset_id, window } => {
            failures_by_asset(store, asset_id, &window.resolve(now)).await?
        }
        ReportRequest::ActionsByMonth { month, year } => {
            actions_by_month(store, month, year, offset).await?
        }
        ReportRequest::AssetHealth { window } => {
            let rows = AggregationEngine::new(Arc::clone(store))
                .aggregate(&window.resolve(now))
                .await?;
            let records = rows.into_iter().map(asset_health_record).collect();
            (ASSET_HEALTH_TITLE.to_string(), records)
        }
    };

    let table = Projector::new(offset).project(kind, title, &records, kind.columns());
    tracing::info!(kind = kind.as_str(), rows = table.rows.len(), "Generated report");
    Ok(table)
}

async fn failures_by_asset(
    store: &Arc<dyn EntityStore>,
    asset_id: DbId,
    window: &ReportWindow,
) -> AppResult<(String, Vec<ReportRecord>)> {
    let asset = store
        .get_asset(asset_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Asset",
            id: asset_id,
        })?;

    let query = ChildQuery::for_asset(asset_id, DateFilter::from_window(window));
    let failures = store.list_failures(&query).await?;

    let title = failures_title(&asset.code, &asset.name);
    let asset_ref = asset_ref(&asset);
    let records = failures
        .into_iter()
        .map(|f| ReportRecord::Failure(failure_record(f, Some(asset_ref.clone()))))
        .collect();
    Ok((title, records))
}

async fn actions_by_month(
    store: &Arc<dyn EntityStore>,
    month: u32,
    year: i32,
    offset: FixedOffset,
) -> AppResult<(String, Vec<ReportRecord>)> {
    let all = ChildQuery::all();
    let (assets, actions) = futures::try_join!(store.list_assets(), store.list_actions(&all))?;

    let by_id: HashMap<DbId, AssetRef> = assets.iter().map(|a| (a.id, asset_ref(a))).collect();
    let records = actions
        .into_iter()
        .filter(|a| in_calendar_month(a.performed_at, year, month, offset))
        .map(|a| {
            let asset = by_id.get(&a.asset_id).cloned();
            ReportRecord::Action(action_record(a, asset))
        })
        .collect();
    Ok((actions_by_month_title(month, year), records))
}

// ---------------------------------------------------------------------------
// Row -> record conversion
// ---------------------------------------------------------------------------

fn asset_ref(asset: &Asset) -> AssetRef {
    AssetRef {
        code: Some(asset.code.clone()),
        name: Some(asset.name.clone()),
    }
}

fn failure_record(f: Failure, asset: Option<AssetRef>) -> FailureRecord {
    FailureRecord {
        asset_id: Some(f.asset_id),
        asset,
        failure_type: Some(f.failure_type),
        description: f.description,
        resolution_details: f.resolution_details,
        severity: Some(f.severity),
        status: Some(f.status),
        resolved_by: f.resolved_by,
        reported_by: f.reported_by,
        detected_at: Some(f.detected_at),
        resolved_at: f.resolved_at,
        created_at: Some(f.created_at),
        updated_at: Some(f.updated_at),
        custom_fields: f.custom_fields,
    }
}

fn action_record(a: Action, asset: Option<AssetRef>) -> ActionRecord {
    ActionRecord {
        asset_id: Some(a.asset_id),
        asset,
        action_type: Some(a.action_type),
        description: a.description,
        severity: Some(a.severity),
        status: Some(a.status),
        performed_by: a.performed_by,
        created_by: Some(a.created_by),
        performed_at: Some(a.performed_at),
        created_at: Some(a.created_at),
        updated_at: Some(a.updated_at),
        custom_fields: Some(a.custom_fields),
    }
}

fn asset_health_record(row: AggregatedAssetRow) -> ReportRecord {
    let asset = row.asset;
    ReportRecord::AssetHealth(AssetHealthRecord {
        id: Some(asset.id),
        code: Some(asset.code),
        name: Some(asset.name),
        location: asset.location,
        system: asset.system,
        specifications: asset.specifications,
        actions_count: Some(row.actions_count),
        failures_count: Some(row.failures_count),
        created_at: Some(asset.created_at),
        updated_at: Some(asset.updated_at),
        custom_fields: asset.custom_fields,
    })
}
