//! Shared query parameter types for API handlers.

use chrono::FixedOffset;
use maintrack_core::date_filter::DateFilter;
use maintrack_core::error::CoreError;
use maintrack_core::report_window::{parse_optional_wire_date, resolve, DatePreset, ReportWindow};
use serde::Deserialize;

/// Optional `?start_date=&end_date=` window used by list and count endpoints.
///
/// Either bound may be omitted; both omitted means unbounded.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeParams {
    /// Resolve as a custom window in the report zone.
    pub fn to_window(&self, offset: FixedOffset) -> Result<ReportWindow, CoreError> {
        let start = parse_optional_wire_date(self.start_date.as_deref(), offset)?;
        let end = parse_optional_wire_date(self.end_date.as_deref(), offset)?;
        let now = chrono::Utc::now().with_timezone(&offset);
        Ok(resolve(DatePreset::Custom, start, end, now))
    }

    pub fn to_filter(&self, offset: FixedOffset) -> Result<DateFilter, CoreError> {
        self.to_window(offset).map(|w| DateFilter::from_window(&w))
    }
}

/// Query parameters for `GET /assets`.
#[derive(Debug, Default, Deserialize)]
pub struct AssetListParams {
    #[serde(default)]
    pub include_counts: bool,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl AssetListParams {
    pub fn range(&self) -> DateRangeParams {
        DateRangeParams {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}
