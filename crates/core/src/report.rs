//! Report projection.
//!
//! Turns the records of one report kind into an ordered, column-labelled
//! table. Every default for a missing value is applied here and nowhere
//! else:
//!
//! - missing scalars render as [`MISSING`] (`"-"`),
//! - a missing `custom_fields` object renders as [`NOT_SPECIFIED`],
//! - an unresolved parent asset renders as [`UNKNOWN_ASSET`],
//! - failure status defaults to `"Open"`, action status to `"Planned"`.
//!
//! The output column list is always the caller's column list, verbatim.

use chrono::{FixedOffset, Offset, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::CoreError;
use crate::maintenance::{ActionStatus, DEFAULT_FAILURE_STATUS};
use crate::types::{DbId, Timestamp};

/// Rendered for a missing scalar value.
pub const MISSING: &str = "-";

/// Rendered for a missing nested object such as `custom_fields`.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Rendered for the code/name of a parent asset that could not be resolved.
pub const UNKNOWN_ASSET: &str = "N/A";

/// Message attached to a report with zero rows.
pub const EMPTY_REPORT_MESSAGE: &str = "No data found for the specified criteria.";

/// Display format of `*_formatted` columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Suffix marking a column that renders a formatted timestamp.
const FORMATTED_SUFFIX: &str = "_formatted";

// ---------------------------------------------------------------------------
// ReportKind and column specs
// ---------------------------------------------------------------------------

/// The three report kinds exposed by the report API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    FailuresByAsset,
    ActionsByMonth,
    AssetHealth,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::FailuresByAsset => "failures_by_asset",
            ReportKind::ActionsByMonth => "actions_by_month",
            ReportKind::AssetHealth => "asset_health",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "failures_by_asset" => Ok(ReportKind::FailuresByAsset),
            "actions_by_month" => Ok(ReportKind::ActionsByMonth),
            "asset_health" => Ok(ReportKind::AssetHealth),
            other => Err(CoreError::Validation(format!("Unknown report kind '{other}'"))),
        }
    }

    /// The fixed column order of this report kind.
    pub fn columns(&self) -> &'static [ColumnDef] {
        match self {
            ReportKind::FailuresByAsset => FAILURE_REPORT_COLUMNS,
            ReportKind::ActionsByMonth => ACTION_MONTH_COLUMNS,
            ReportKind::AssetHealth => ASSET_HEALTH_COLUMNS,
        }
    }
}

/// A report column: the row key and its human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub key: &'static str,
    pub label: &'static str,
}

const fn col(key: &'static str, label: &'static str) -> ColumnDef {
    ColumnDef { key, label }
}

pub const FAILURE_REPORT_COLUMNS: &[ColumnDef] = &[
    col("no", "No."),
    col("asset_id", "Asset ID"),
    col("asset_code", "Asset Code"),
    col("asset_name", "Asset Name"),
    col("type", "Type"),
    col("description", "Description"),
    col("resolution_details", "Resolution Details"),
    col("severity", "Severity"),
    col("status", "Status"),
    col("resolved_by", "Resolved By"),
    col("reported_by", "Reported By"),
    col("detected_at_formatted", "Detected At"),
    col("resolved_at_formatted", "Resolved At"),
    col("created_at_formatted", "Created At"),
    col("updated_at_formatted", "Updated At"),
];

pub const ACTION_MONTH_COLUMNS: &[ColumnDef] = &[
    col("no", "No."),
    col("asset_id", "Asset ID"),
    col("asset_code", "Asset Code"),
    col("asset_name", "Asset Name"),
    col("type", "Type"),
    col("description", "Description"),
    col("severity", "Severity"),
    col("status", "Status"),
    col("performed_by", "Performed By"),
    col("created_by", "Created By"),
    col("created_at_formatted", "Created At"),
    col("performed_at_formatted", "Performed At"),
    col("updated_at_formatted", "Updated At"),
];

pub const ASSET_HEALTH_COLUMNS: &[ColumnDef] = &[
    col("no", "No."),
    col("id", "ID"),
    col("code", "Code"),
    col("name", "Name"),
    col("location", "Location"),
    col("maintenance_actions_count", "Maintenance Actions"),
    col("failures_count", "Failures"),
    col("created_at_formatted", "Created At"),
    col("updated_at_formatted", "Updated At"),
];

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

pub fn failures_title(asset_code: &str, asset_name: &str) -> String {
    format!("Failures for Asset {asset_code} - {asset_name}")
}

pub fn actions_by_month_title(month: u32, year: i32) -> String {
    format!("Maintenance Actions for {month}/{year}")
}

pub const ASSET_HEALTH_TITLE: &str = "Asset Health Report";

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// Colour family of a badge, named after the UI's contextual classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Success,
    Info,
    Warning,
    Danger,
    Secondary,
}

/// A labelled status or severity marker. Exports flatten it to `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

/// Badge tone for a severity value.
pub fn severity_tone(severity: &str) -> BadgeTone {
    match severity {
        "critical" => BadgeTone::Danger,
        "high" => BadgeTone::Warning,
        "medium" => BadgeTone::Info,
        _ => BadgeTone::Secondary,
    }
}

/// Badge tone for a (free-text or action) status value.
pub fn status_tone(status: &str) -> BadgeTone {
    match status {
        "Resolved" | "Closed" | "Completed" => BadgeTone::Success,
        "In Progress" => BadgeTone::Info,
        _ => BadgeTone::Warning,
    }
}

/// One rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(i64),
    Text(String),
    Badge(Badge),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn missing() -> Self {
        Cell::Text(MISSING.to_string())
    }

    /// Plain-text rendering used by exporters.
    pub fn to_plain_text(&self) -> String {
        match self {
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Badge(b) => b.label.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Denormalized parent-asset identity carried by child records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetRef {
    pub code: Option<String>,
    pub name: Option<String>,
}

/// A failure as seen by the failures-by-asset report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailureRecord {
    pub asset_id: Option<DbId>,
    /// `None` when the parent asset could not be resolved.
    pub asset: Option<AssetRef>,
    pub failure_type: Option<String>,
    pub description: Option<String>,
    pub resolution_details: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub resolved_by: Option<String>,
    pub reported_by: Option<String>,
    pub detected_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub custom_fields: Option<serde_json::Value>,
}

/// A maintenance action as seen by the actions-by-month report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionRecord {
    pub asset_id: Option<DbId>,
    pub asset: Option<AssetRef>,
    pub action_type: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub performed_by: Option<String>,
    pub created_by: Option<String>,
    pub performed_at: Option<Timestamp>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub custom_fields: Option<serde_json::Value>,
}

/// An asset with its windowed child counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetHealthRecord {
    pub id: Option<DbId>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub system: Option<String>,
    pub specifications: Option<String>,
    pub actions_count: Option<i64>,
    pub failures_count: Option<i64>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub custom_fields: Option<serde_json::Value>,
}

/// Input row of the projector.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportRecord {
    Failure(FailureRecord),
    Action(ActionRecord),
    AssetHealth(AssetHealthRecord),
}

/// Raw value of a record field before rendering.
enum Field<'a> {
    Absent,
    Text(&'a str),
    Int(i64),
    Time(Timestamp),
    Json(&'a serde_json::Value),
    /// The record references an asset that could not be resolved.
    UnknownAsset,
}

fn text(v: &Option<String>) -> Field<'_> {
    v.as_deref().map_or(Field::Absent, Field::Text)
}

fn int(v: Option<i64>) -> Field<'static> {
    v.map_or(Field::Absent, Field::Int)
}

fn time(v: Option<Timestamp>) -> Field<'static> {
    v.map_or(Field::Absent, Field::Time)
}

fn json(v: &Option<serde_json::Value>) -> Field<'_> {
    match v {
        None | Some(serde_json::Value::Null) => Field::Absent,
        Some(value) => Field::Json(value),
    }
}

fn asset_code(asset: &Option<AssetRef>) -> Field<'_> {
    asset.as_ref().map_or(Field::UnknownAsset, |a| text(&a.code))
}

fn asset_name(asset: &Option<AssetRef>) -> Field<'_> {
    asset.as_ref().map_or(Field::UnknownAsset, |a| text(&a.name))
}

impl ReportRecord {
    fn field(&self, key: &str) -> Field<'_> {
        match self {
            ReportRecord::Failure(f) => match key {
                "asset_id" => int(f.asset_id),
                "asset_code" => asset_code(&f.asset),
                "asset_name" => asset_name(&f.asset),
                "type" => text(&f.failure_type),
                "description" => text(&f.description),
                "resolution_details" => text(&f.resolution_details),
                "severity" => text(&f.severity),
                "status" => text(&f.status),
                "resolved_by" => text(&f.resolved_by),
                "reported_by" => text(&f.reported_by),
                "detected_at" => time(f.detected_at),
                "resolved_at" => time(f.resolved_at),
                "created_at" => time(f.created_at),
                "updated_at" => time(f.updated_at),
                "custom_fields" => json(&f.custom_fields),
                _ => Field::Absent,
            },
            ReportRecord::Action(a) => match key {
                "asset_id" => int(a.asset_id),
                "asset_code" => asset_code(&a.asset),
                "asset_name" => asset_name(&a.asset),
                "type" => text(&a.action_type),
                "description" => text(&a.description),
                "severity" => text(&a.severity),
                "status" => text(&a.status),
                "performed_by" => text(&a.performed_by),
                "created_by" => text(&a.created_by),
                "performed_at" => time(a.performed_at),
                "created_at" => time(a.created_at),
                "updated_at" => time(a.updated_at),
                "custom_fields" => json(&a.custom_fields),
                _ => Field::Absent,
            },
            ReportRecord::AssetHealth(h) => match key {
                "id" => int(h.id),
                "code" => text(&h.code),
                "name" => text(&h.name),
                "location" => text(&h.location),
                "system" => text(&h.system),
                "specifications" => text(&h.specifications),
                "maintenance_actions_count" | "actions_count" => int(h.actions_count),
                "failures_count" => int(h.failures_count),
                "created_at" => time(h.created_at),
                "updated_at" => time(h.updated_at),
                "custom_fields" => json(&h.custom_fields),
                _ => Field::Absent,
            },
        }
    }

    /// Value used when a blank status must be filled.
    fn default_status(&self) -> Option<&'static str> {
        match self {
            ReportRecord::Failure(_) => Some(DEFAULT_FAILURE_STATUS),
            ReportRecord::Action(_) => Some(ActionStatus::default().as_str()),
            ReportRecord::AssetHealth(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Rows and tables
// ---------------------------------------------------------------------------

/// One rendered row. Serializes as a JSON object whose keys follow the
/// column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    cells: Vec<(&'static str, Cell)>,
}

impl ReportRow {
    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, c)| c)
    }

    /// Cells in column order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().map(|(_, c)| c)
    }
}

impl Serialize for ReportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, cell) in &self.cells {
            map.serialize_entry(key, cell)?;
        }
        map.end()
    }
}

/// Export-ready report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub kind: ReportKind,
    pub title: String,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<ReportRow>,
    /// Set when the report has no rows.
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Projector
// ---------------------------------------------------------------------------

/// Renders records into a [`ReportTable`].
///
/// `offset` is the zone in which `*_formatted` timestamps are displayed.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    offset: FixedOffset,
}

impl Default for Projector {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }
}

impl Projector {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Project `records` (already filtered and sorted) onto `columns`.
    pub fn project(
        &self,
        kind: ReportKind,
        title: impl Into<String>,
        records: &[ReportRecord],
        columns: &[ColumnDef],
    ) -> ReportTable {
        let rows: Vec<ReportRow> = records
            .iter()
            .enumerate()
            .map(|(index, record)| ReportRow {
                cells: columns
                    .iter()
                    .map(|c| (c.key, self.render(record, c.key, index)))
                    .collect(),
            })
            .collect();

        let message = rows.is_empty().then(|| EMPTY_REPORT_MESSAGE.to_string());

        ReportTable {
            kind,
            title: title.into(),
            columns: columns.to_vec(),
            rows,
            message,
        }
    }

    fn render(&self, record: &ReportRecord, key: &str, index: usize) -> Cell {
        if key == "no" {
            return Cell::Number(index as i64 + 1);
        }
        if let Some(base) = key.strip_suffix(FORMATTED_SUFFIX) {
            return match record.field(base) {
                Field::Time(t) => Cell::Text(self.format_timestamp(t)),
                other => self.scalar(other),
            };
        }

        let field = record.field(key);
        match key {
            "severity" => match field {
                Field::Text(s) if !s.trim().is_empty() => Cell::Badge(Badge {
                    label: s.to_string(),
                    tone: severity_tone(s),
                }),
                _ => Cell::missing(),
            },
            "status" => {
                let status = match field {
                    Field::Text(s) if !s.trim().is_empty() => Some(s),
                    _ => record.default_status(),
                };
                match status {
                    Some(s) => Cell::Badge(Badge {
                        label: s.to_string(),
                        tone: status_tone(s),
                    }),
                    None => Cell::missing(),
                }
            }
            "custom_fields" => match field {
                Field::Absent => Cell::text(NOT_SPECIFIED),
                other => self.scalar(other),
            },
            "resolved_by" | "reported_by" | "resolution_details" | "performed_by"
            | "created_by" => match field {
                Field::Text(s) if s.trim().is_empty() => Cell::missing(),
                other => self.scalar(other),
            },
            _ => self.scalar(field),
        }
    }

    fn scalar(&self, field: Field<'_>) -> Cell {
        match field {
            Field::Absent => Cell::missing(),
            Field::UnknownAsset => Cell::text(UNKNOWN_ASSET),
            Field::Text(s) => Cell::text(s),
            Field::Int(n) => Cell::Number(n),
            Field::Time(t) => Cell::Text(t.to_rfc3339()),
            Field::Json(v) => Cell::Text(v.to_string()),
        }
    }

    fn format_timestamp(&self, ts: Timestamp) -> String {
        ts.with_timezone(&self.offset)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }
}
