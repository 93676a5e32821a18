//! Report date windows.
//!
//! Expands a named [`DatePreset`] into a concrete [`ReportWindow`] of
//! inclusive UTC instants. Day and month boundaries are computed in the
//! report time zone, carried as the fixed offset of `now`.
//!
//! Every start bound is the first instant of its day (`00:00:00.000`) and
//! every end bound is the last millisecond of its day (`23:59:59.999`).

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// DatePreset
// ---------------------------------------------------------------------------

/// Named shorthand for a report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DatePreset {
    #[default]
    #[serde(rename = "all_time")]
    AllTime,
    #[serde(rename = "last_day")]
    LastDay,
    #[serde(rename = "last_2_days")]
    Last2Days,
    #[serde(rename = "last_week")]
    LastWeek,
    #[serde(rename = "last_month")]
    LastMonth,
    #[serde(rename = "custom")]
    Custom,
}

impl DatePreset {
    pub const ALL: [DatePreset; 6] = [
        DatePreset::AllTime,
        DatePreset::LastDay,
        DatePreset::Last2Days,
        DatePreset::LastWeek,
        DatePreset::LastMonth,
        DatePreset::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatePreset::AllTime => "all_time",
            DatePreset::LastDay => "last_day",
            DatePreset::Last2Days => "last_2_days",
            DatePreset::LastWeek => "last_week",
            DatePreset::LastMonth => "last_month",
            DatePreset::Custom => "custom",
        }
    }

    /// Parse a preset name. Unknown names are a validation error.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown date range preset '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// ReportWindow
// ---------------------------------------------------------------------------

/// Concrete, inclusive time window for one report request.
///
/// `None` on either side means that side is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportWindow {
    pub preset: DatePreset,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl ReportWindow {
    /// The window that filters nothing.
    pub fn all_time() -> Self {
        Self::default()
    }

    /// A custom window from already-resolved instants.
    pub fn between(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self {
            preset: DatePreset::Custom,
            start,
            end,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Resolve `preset` against `now`.
///
/// `custom_start` / `custom_end` are only consulted for
/// [`DatePreset::Custom`]; each bound is optional and independent. A custom
/// preset with neither bound behaves exactly like [`DatePreset::AllTime`].
pub fn resolve(
    preset: DatePreset,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
    now: DateTime<FixedOffset>,
) -> ReportWindow {
    let offset = *now.offset();
    let today = now.date_naive();
    let days_ago = |n: i64| today - Duration::days(n);

    let (start, end) = match preset {
        DatePreset::AllTime => (None, None),
        DatePreset::LastDay => (
            Some(start_of_day(days_ago(1), offset)),
            Some(end_of_day(today, offset)),
        ),
        DatePreset::Last2Days => (
            Some(start_of_day(days_ago(2), offset)),
            Some(end_of_day(days_ago(1), offset)),
        ),
        DatePreset::LastWeek => (
            Some(start_of_day(days_ago(7), offset)),
            Some(end_of_day(days_ago(1), offset)),
        ),
        DatePreset::LastMonth => {
            let first_of_this_month = today - Duration::days(i64::from(today.day0()));
            let last_of_prev_month = first_of_this_month - Duration::days(1);
            let first_of_prev_month =
                last_of_prev_month - Duration::days(i64::from(last_of_prev_month.day0()));
            (
                Some(start_of_day(first_of_prev_month, offset)),
                Some(end_of_day(last_of_prev_month, offset)),
            )
        }
        DatePreset::Custom => (
            custom_start.map(|d| start_of_day(d, offset)),
            custom_end.map(|d| end_of_day(d, offset)),
        ),
    };

    ReportWindow { preset, start, end }
}

/// First instant of `date` in the zone `offset`, as UTC.
pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> Timestamp {
    let local_midnight = date.and_time(NaiveTime::MIN);
    let utc = local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()));
    Utc.from_utc_datetime(&utc)
}

/// Last millisecond (`23:59:59.999`) of `date` in the zone `offset`, as UTC.
pub fn end_of_day(date: NaiveDate, offset: FixedOffset) -> Timestamp {
    start_of_day(date, offset) + Duration::days(1) - Duration::milliseconds(1)
}

// ---------------------------------------------------------------------------
// Wire parsing
// ---------------------------------------------------------------------------

/// Parse a wire date: `YYYY-MM-DD`, an RFC 3339 date-time, or an
/// ISO-8601 date-time without offset.
///
/// A zoned date-time contributes its calendar date in the report zone; a
/// naive one is already local. Years are exactly four digits.
pub fn parse_wire_date(s: &str, offset: FixedOffset) -> Result<NaiveDate, CoreError> {
    let trimmed = s.trim();
    let invalid = || {
        CoreError::Validation(format!(
            "Invalid date '{s}'. Use YYYY-MM-DD or an ISO-8601 date-time"
        ))
    };
    if !has_four_digit_year(trimmed) {
        return Err(invalid());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&offset).date_naive());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.date())
        .map_err(|_| invalid())
}

fn has_four_digit_year(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 5 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

/// Parse an optional wire date, treating empty strings as absent.
pub fn parse_optional_wire_date(
    s: Option<&str>,
    offset: FixedOffset,
) -> Result<Option<NaiveDate>, CoreError> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_wire_date(value, offset).map(Some),
    }
}

/// Build the report zone from a UTC offset in minutes.
pub fn report_offset(minutes: i32) -> Result<FixedOffset, CoreError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| CoreError::Validation(format!("Invalid UTC offset: {minutes} minutes")))
}

// ---------------------------------------------------------------------------
// Calendar months
// ---------------------------------------------------------------------------

/// Check a month selector (1-12).
pub fn validate_month(month: u32) -> Result<(), CoreError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Month must be between 1 and 12, got {month}"
        )))
    }
}

/// Exact calendar-month match of `ts` in the report zone.
///
/// This is not a rolling window: `2024-03-31T23:59:59` belongs to March and
/// `2024-04-01T00:00:00` to April, in local time.
pub fn in_calendar_month(ts: Timestamp, year: i32, month: u32, offset: FixedOffset) -> bool {
    let local = ts.with_timezone(&offset);
    local.year() == year && local.month() == month
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn utc_now(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // -----------------------------------------------------------------------
    // Presets
    // -----------------------------------------------------------------------

    #[test]
    fn last_day_covers_yesterday_and_today() {
        let w = resolve(DatePreset::LastDay, None, None, utc_now("2024-03-20T12:00:00Z"));
        assert_eq!(w.start, Some(ts("2024-03-19T00:00:00.000Z")));
        assert_eq!(w.end, Some(ts("2024-03-20T23:59:59.999Z")));
    }

    #[test]
    fn last_2_days_excludes_today() {
        let w = resolve(DatePreset::Last2Days, None, None, utc_now("2024-03-20T12:00:00Z"));
        assert_eq!(w.start, Some(ts("2024-03-18T00:00:00Z")));
        assert_eq!(w.end, Some(ts("2024-03-19T23:59:59.999Z")));
    }

    #[test]
    fn last_week_is_seven_days_ending_yesterday() {
        let w = resolve(DatePreset::LastWeek, None, None, utc_now("2024-03-20T00:00:00Z"));
        assert_eq!(w.start, Some(ts("2024-03-13T00:00:00Z")));
        assert_eq!(w.end, Some(ts("2024-03-19T23:59:59.999Z")));
    }

    #[test]
    fn last_month_handles_leap_february() {
        let w = resolve(DatePreset::LastMonth, None, None, utc_now("2024-03-20T12:00:00Z"));
        assert_eq!(w.start, Some(ts("2024-02-01T00:00:00Z")));
        assert_eq!(w.end, Some(ts("2024-02-29T23:59:59.999Z")));
    }

    #[test]
    fn last_month_crosses_year_boundary() {
        let w = resolve(DatePreset::LastMonth, None, None, utc_now("2025-01-01T00:00:00Z"));
        assert_eq!(w.start, Some(ts("2024-12-01T00:00:00Z")));
        assert_eq!(w.end, Some(ts("2024-12-31T23:59:59.999Z")));
    }

    #[test]
    fn all_time_is_unbounded() {
        let w = resolve(DatePreset::AllTime, None, None, utc_now("2024-03-20T12:00:00Z"));
        assert!(w.is_unbounded());
    }

    #[test]
    fn all_time_ignores_custom_bounds() {
        let w = resolve(
            DatePreset::AllTime,
            Some(date("2024-01-01")),
            Some(date("2024-01-31")),
            utc_now("2024-03-20T12:00:00Z"),
        );
        assert!(w.is_unbounded());
    }

    #[test]
    fn custom_without_bounds_equals_all_time() {
        let now = utc_now("2024-03-20T12:00:00Z");
        let custom = resolve(DatePreset::Custom, None, None, now);
        let all = resolve(DatePreset::AllTime, None, None, now);
        assert_eq!((custom.start, custom.end), (all.start, all.end));
    }

    #[test]
    fn custom_bounds_are_independent() {
        let now = utc_now("2024-03-20T12:00:00Z");
        let only_start = resolve(DatePreset::Custom, Some(date("2024-03-01")), None, now);
        assert_eq!(only_start.start, Some(ts("2024-03-01T00:00:00Z")));
        assert_eq!(only_start.end, None);

        let only_end = resolve(DatePreset::Custom, None, Some(date("2024-03-10")), now);
        assert_eq!(only_end.start, None);
        assert_eq!(only_end.end, Some(ts("2024-03-10T23:59:59.999Z")));
    }

    #[test]
    fn end_never_precedes_start_for_any_preset() {
        let nows = [
            "2024-01-01T00:00:00Z",
            "2024-02-29T23:59:59Z",
            "2024-03-20T12:00:00Z",
            "2024-12-31T23:30:00+05:30",
            "2023-03-01T00:00:00-08:00",
        ];
        for now in nows {
            for preset in DatePreset::ALL {
                let w = resolve(preset, Some(date("2024-03-01")), Some(date("2024-03-02")), utc_now(now));
                if let (Some(start), Some(end)) = (w.start, w.end) {
                    assert!(end >= start, "{} at {now}: {start} > {end}", preset.as_str());
                }
            }
        }
    }

    #[test]
    fn day_boundaries_follow_report_offset() {
        // 08:00 local on the 20th at UTC+7.
        let w = resolve(DatePreset::LastDay, None, None, utc_now("2024-03-20T08:00:00+07:00"));
        assert_eq!(w.start, Some(ts("2024-03-18T17:00:00Z")));
        assert_eq!(w.end, Some(ts("2024-03-20T16:59:59.999Z")));
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    #[test]
    fn preset_names_round_trip() {
        for preset in DatePreset::ALL {
            assert_eq!(DatePreset::parse(preset.as_str()).unwrap(), preset);
        }
    }

    #[test]
    fn unknown_preset_is_validation_error() {
        assert_matches!(DatePreset::parse("last_year"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn preset_deserializes_from_snake_case() {
        let p: DatePreset = serde_json::from_str("\"last_2_days\"").unwrap();
        assert_eq!(p, DatePreset::Last2Days);
    }

    #[test]
    fn wire_date_accepts_plain_date_and_datetime() {
        let utc = report_offset(0).unwrap();
        assert_eq!(parse_wire_date("2024-03-19", utc).unwrap(), date("2024-03-19"));
        assert_eq!(
            parse_wire_date("2024-03-19T23:59:59.999Z", utc).unwrap(),
            date("2024-03-19")
        );
    }

    #[test]
    fn wire_datetime_uses_report_zone_date() {
        let plus7 = report_offset(7 * 60).unwrap();
        assert_eq!(
            parse_wire_date("2024-03-19T20:00:00Z", plus7).unwrap(),
            date("2024-03-20")
        );
    }

    #[test]
    fn wire_date_rejects_garbage() {
        let utc = report_offset(0).unwrap();
        assert_matches!(parse_wire_date("19/03/2024", utc), Err(CoreError::Validation(_)));
        assert_matches!(parse_wire_date("2024-02-30", utc), Err(CoreError::Validation(_)));
    }

    #[test]
    fn wire_date_rejects_extended_years() {
        let plus7 = report_offset(7 * 60).unwrap();
        for value in ["+262142-12-31", "-262143-01-01", "12024-01-01", "+2024-01-01"] {
            assert_matches!(
                parse_wire_date(value, plus7),
                Err(CoreError::Validation(_)),
                "{value}"
            );
        }
    }

    #[test]
    fn four_digit_year_extremes_resolve() {
        let plus7 = report_offset(7 * 60).unwrap();
        let start = parse_wire_date("0000-01-01", plus7).unwrap();
        let end = parse_wire_date("9999-12-31", plus7).unwrap();
        let window = resolve(
            DatePreset::Custom,
            Some(start),
            Some(end),
            utc_now("2024-03-20T12:00:00+07:00"),
        );
        assert!(window.start.is_some());
        assert!(window.end.is_some());
    }

    #[test]
    fn wire_naive_datetime_is_local_date() {
        let plus7 = report_offset(7 * 60).unwrap();
        assert_eq!(
            parse_wire_date("2024-03-19T10:00:00", plus7).unwrap(),
            date("2024-03-19")
        );
        assert_eq!(
            parse_wire_date("2024-03-19T23:59:59.250", plus7).unwrap(),
            date("2024-03-19")
        );
    }

    #[test]
    fn empty_optional_wire_date_is_absent() {
        let utc = report_offset(0).unwrap();
        assert_eq!(parse_optional_wire_date(Some(""), utc).unwrap(), None);
        assert_eq!(parse_optional_wire_date(None, utc).unwrap(), None);
    }

    #[test]
    fn report_offset_rejects_out_of_range() {
        assert!(report_offset(24 * 60).is_err());
        assert!(report_offset(-300).is_ok());
    }

    // -----------------------------------------------------------------------
    // Calendar months
    // -----------------------------------------------------------------------

    #[test]
    fn calendar_month_is_exact_match() {
        let utc = report_offset(0).unwrap();
        let performed = ts("2024-03-05T00:00:00Z");
        assert!(in_calendar_month(performed, 2024, 3, utc));
        assert!(!in_calendar_month(performed, 2024, 4, utc));
        assert!(!in_calendar_month(performed, 2023, 3, utc));
    }

    #[test]
    fn calendar_month_edges_use_local_time() {
        let plus7 = report_offset(7 * 60).unwrap();
        // 2024-03-31T18:00Z is 2024-04-01T01:00 at UTC+7.
        let ts = ts("2024-03-31T18:00:00Z");
        assert!(in_calendar_month(ts, 2024, 4, plus7));
        assert!(!in_calendar_month(ts, 2024, 3, plus7));
    }

    #[test]
    fn month_selector_bounds() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert_matches!(validate_month(0), Err(CoreError::Validation(_)));
        assert_matches!(validate_month(13), Err(CoreError::Validation(_)));
    }
}
