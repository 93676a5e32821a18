//! CSV rendering of projected reports.

use chrono::NaiveDate;

use crate::report::ReportTable;

/// Render `table` as CSV: one header line of column labels followed by one
/// line per row. Badges are flattened to their label. Lines end in CRLF.
pub fn to_csv(table: &ReportTable) -> String {
    let mut out = String::new();

    let header: Vec<String> = table.columns.iter().map(|c| escape(c.label)).collect();
    out.push_str(&header.join(","));
    out.push_str("\r\n");

    for row in &table.rows {
        let line: Vec<String> = row
            .cells()
            .map(|cell| escape(&cell.to_plain_text()))
            .collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }

    out
}

/// Suggested download name, e.g. `asset_health_2024-03-20.csv`.
pub fn csv_filename(table: &ReportTable, date: NaiveDate) -> String {
    format!("{}_{}.csv", table.kind.as_str(), date.format("%Y-%m-%d"))
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{
        AssetHealthRecord, FailureRecord, Projector, ReportKind, ReportRecord, ASSET_HEALTH_TITLE,
    };

    fn health_table(records: Vec<AssetHealthRecord>) -> ReportTable {
        let records: Vec<_> = records.into_iter().map(ReportRecord::AssetHealth).collect();
        Projector::default().project(
            ReportKind::AssetHealth,
            ASSET_HEALTH_TITLE,
            &records,
            ReportKind::AssetHealth.columns(),
        )
    }

    #[test]
    fn header_uses_labels() {
        let csv = to_csv(&health_table(vec![]));
        assert_eq!(
            csv,
            "No.,ID,Code,Name,Location,Maintenance Actions,Failures,Created At,Updated At\r\n"
        );
    }

    #[test]
    fn quotes_fields_with_delimiters() {
        let csv = to_csv(&health_table(vec![AssetHealthRecord {
            id: Some(1),
            code: Some("A-1".into()),
            name: Some("Pump, \"main\"".into()),
            location: Some("Hall\nB".into()),
            actions_count: Some(2),
            failures_count: Some(0),
            ..Default::default()
        }]));
        let line = csv.split("\r\n").nth(1).unwrap();
        assert_eq!(line, "1,1,A-1,\"Pump, \"\"main\"\"\",\"Hall\nB\",2,0,-,-");
    }

    #[test]
    fn badges_flatten_to_label() {
        let table = Projector::default().project(
            ReportKind::FailuresByAsset,
            "t",
            &[ReportRecord::Failure(FailureRecord {
                severity: Some("high".into()),
                ..Default::default()
            })],
            ReportKind::FailuresByAsset.columns(),
        );
        let csv = to_csv(&table);
        let line = csv.split("\r\n").nth(1).unwrap();
        let fields: Vec<_> = line.split(',').collect();
        assert_eq!(fields[7], "high");
        assert_eq!(fields[8], "Open");
    }

    #[test]
    fn filename_carries_kind_and_date() {
        let table = health_table(vec![]);
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        assert_eq!(csv_filename(&table, date), "asset_health_2024-03-20.csv");
    }
}
