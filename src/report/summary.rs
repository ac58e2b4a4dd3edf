//! Aggregate counts and the "Summary" sheet.

use super::layout::{Cell, Column, Row, SheetLayout};
use super::styles::{StyleName, StyleRegistry};
use super::types::{ResultRecord, SummaryStat, TestStatus};
use crate::utils::config::LayoutConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const SUMMARY_SHEET: &str = "Summary";
pub const SUMMARY_TEXT_FILE: &str = "test-summary.txt";

/// Total, passed and failed counts, in that order.
///
/// Total includes every status; only exact `PASSED`/`FAILED` are counted as such.
pub fn calculate_summary_stats(records: &[ResultRecord]) -> Vec<SummaryStat> {
    let passed = records
        .iter()
        .filter(|r| r.status == TestStatus::Passed)
        .count();
    let failed = records
        .iter()
        .filter(|r| r.status == TestStatus::Failed)
        .count();

    vec![
        SummaryStat::new("Total Tests", records.len() as u64),
        SummaryStat::new("Passed Tests", passed as u64),
        SummaryStat::new("Failed Tests", failed as u64),
    ]
}

pub fn build_summary_sheet(
    stats: &[SummaryStat],
    styles: &StyleRegistry,
    layout: &LayoutConfig,
) -> SheetLayout {
    let columns = ["Metric", "Value"]
        .iter()
        .zip(layout.summary_column_widths)
        .map(|(header, width)| Column {
            header: header.to_string(),
            width,
        })
        .collect();

    let mut sheet = SheetLayout::new(SUMMARY_SHEET, columns);
    sheet.frozen_rows = 1;

    let header = *styles.get(StyleName::SummaryHeader);
    sheet.rows.push(Row {
        cells: sheet
            .columns
            .iter()
            .map(|c| Cell::text(c.header.clone(), header))
            .collect(),
        height: None,
    });

    let data = *styles.get(StyleName::DataCell);
    for stat in stats {
        sheet.rows.push(Row {
            cells: vec![
                Cell::text(stat.metric.clone(), data),
                Cell::number(stat.value as f64, data),
            ],
            height: None,
        });
    }

    sheet
}

/// `Total Tests: 4, Passed Tests: 2, Failed Tests: 1`
pub fn summary_line(stats: &[SummaryStat]) -> String {
    stats
        .iter()
        .map(|s| format!("{}: {}", s.metric, s.value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write the one-line summary to `<dir>/test-summary.txt`, replacing any previous file.
pub fn write_summary_text(stats: &[SummaryStat], dir: &Path) -> Result<PathBuf> {
    let path = dir.join(SUMMARY_TEXT_FILE);
    std::fs::write(&path, summary_line(stats))
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    Ok(path)
}

/// Like [`write_summary_text`], but writes nothing when there are no stats.
///
/// Stats are empty only when the conversion never got as far as ingesting.
pub fn write_summary_if_ready(stats: &[SummaryStat], dir: &Path) -> Result<Option<PathBuf>> {
    if stats.is_empty() {
        return Ok(None);
    }
    write_summary_text(stats, dir).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::CellValue;

    fn records(statuses: &[&str]) -> Vec<ResultRecord> {
        statuses
            .iter()
            .map(|s| ResultRecord {
                suite_name: "S".to_string(),
                test_name: "t".to_string(),
                status: TestStatus::parse(s),
                error: String::new(),
                screenshot_path: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_counts() {
        let stats = calculate_summary_stats(&records(&["PASSED", "FAILED", "PASSED", "SKIPPED"]));
        let values: Vec<_> = stats.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![4, 2, 1]);
        assert_eq!(
            summary_line(&stats),
            "Total Tests: 4, Passed Tests: 2, Failed Tests: 1"
        );
    }

    #[test]
    fn test_lowercase_status_is_not_counted_as_passed() {
        let stats = calculate_summary_stats(&records(&["passed", "UNKNOWN"]));
        let values: Vec<_> = stats.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![2, 0, 0]);
    }

    #[test]
    fn test_summary_sheet() {
        let styles = StyleRegistry::new();
        let stats = calculate_summary_stats(&records(&["PASSED"]));
        let sheet = build_summary_sheet(&stats, &styles, &LayoutConfig::default());

        assert_eq!(sheet.name, SUMMARY_SHEET);
        assert_eq!(sheet.frozen_rows, 1);
        assert_eq!(sheet.rows.len(), 4);
        assert_eq!(sheet.rows[0].cells[0].as_text(), Some("Metric"));
        assert_eq!(sheet.rows[0].cells[0].style, *styles.get(StyleName::SummaryHeader));
        assert_eq!(sheet.rows[2].cells[1].value, CellValue::Number(1.0));
        assert!(sheet
            .data_rows()
            .iter()
            .flat_map(|r| &r.cells)
            .all(|c| c.style.wrap_text == Some(true) && c.style.border.is_some()));
    }

    #[test]
    fn test_write_summary_text_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SUMMARY_TEXT_FILE), "stale content").unwrap();

        let stats = calculate_summary_stats(&records(&["FAILED"]));
        let path = write_summary_text(&stats, dir.path()).unwrap();

        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "Total Tests: 1, Passed Tests: 0, Failed Tests: 1"
        );
    }

    #[test]
    fn test_summary_text_skipped_without_stats() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_summary_if_ready(&[], dir.path()).unwrap().is_none());
        assert!(!dir.path().join(SUMMARY_TEXT_FILE).exists());

        let stats = calculate_summary_stats(&records(&["PASSED"]));
        let path = write_summary_if_ready(&stats, dir.path()).unwrap();
        assert_eq!(path, Some(dir.path().join(SUMMARY_TEXT_FILE)));
    }
}
