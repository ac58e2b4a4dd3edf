//! "Test Results" sheet: one row per record, grouped into suite blocks.

use super::diagnostics::Diagnostics;
use super::embed::{EmbeddedRow, ScreenshotEmbedder};
use super::layout::{Cell, Column, ImageAnchor, MergeRange, Row, SheetLayout};
use super::styles::{StyleName, StyleRegistry};
use super::types::{ResultRecord, TestStatus};
use crate::utils::config::LayoutConfig;

pub const RESULTS_SHEET: &str = "Test Results";

const HEADERS: [&str; 5] = ["Suite Name", "Test Name", "Status", "Error", "Screenshot"];
const SUITE_COLUMN: u16 = 0;
const SCREENSHOT_COLUMN: u16 = 4;

/// Builds the results sheet. `embedder` is only consulted when screenshots are bound.
pub struct ResultsSheetBuilder<'a> {
    styles: &'a StyleRegistry,
    layout: &'a LayoutConfig,
    embedder: Option<ScreenshotEmbedder<'a>>,
}

/// Open suite block while walking the records
struct SuiteBlock<'r> {
    name: &'r str,
    first_row: u32,
}

impl<'a> ResultsSheetBuilder<'a> {
    pub fn new(
        styles: &'a StyleRegistry,
        layout: &'a LayoutConfig,
        embedder: Option<ScreenshotEmbedder<'a>>,
    ) -> Self {
        Self {
            styles,
            layout,
            embedder,
        }
    }

    fn include_screenshots(&self) -> bool {
        self.embedder.is_some()
    }

    pub fn build(&self, records: &[ResultRecord], diagnostics: &mut Diagnostics) -> SheetLayout {
        let column_count = if self.include_screenshots() { 5 } else { 4 };
        let columns = HEADERS
            .iter()
            .zip(self.layout.result_column_widths)
            .take(column_count)
            .map(|(header, width)| Column {
                header: header.to_string(),
                width,
            })
            .collect();

        let mut sheet = SheetLayout::new(RESULTS_SHEET, columns);
        sheet.frozen_rows = 1;
        sheet.rows.push(self.header_row(&sheet.columns));

        let mut block: Option<SuiteBlock> = None;

        for (i, record) in records.iter().enumerate() {
            let row_index = i as u32 + 1;

            let starts_block = block
                .as_ref()
                .map_or(true, |open| open.name != record.suite_name);
            if starts_block {
                if let Some(open) = block.take() {
                    sheet.merges.push(self.close_block(&open, row_index - 1));
                }
                block = Some(SuiteBlock {
                    name: &record.suite_name,
                    first_row: row_index,
                });
            }

            let (row, image) = self.record_row(record, row_index, diagnostics);
            sheet.rows.push(row);
            sheet.images.extend(image);
        }

        if let Some(open) = block {
            sheet.merges.push(self.close_block(&open, records.len() as u32));
        }

        sheet
    }

    fn header_row(&self, columns: &[Column]) -> Row {
        let style = *self.styles.get(StyleName::Header);
        Row {
            cells: columns
                .iter()
                .map(|c| Cell::text(c.header.clone(), style))
                .collect(),
            height: None,
        }
    }

    fn close_block(&self, block: &SuiteBlock, last_row: u32) -> MergeRange {
        MergeRange {
            first_row: block.first_row,
            last_row,
            col: SUITE_COLUMN,
            style: *self.styles.get(StyleName::SuiteLabel),
        }
    }

    fn record_row(
        &self,
        record: &ResultRecord,
        row_index: u32,
        diagnostics: &mut Diagnostics,
    ) -> (Row, Option<ImageAnchor>) {
        let base = self.styles.get(StyleName::BorderedCell);
        let style = match record.status {
            TestStatus::Passed => base.layered(self.styles.get(StyleName::PassedFill)),
            TestStatus::Failed => base.layered(self.styles.get(StyleName::FailedFill)),
            TestStatus::Other(_) => *base,
        };

        let mut cells = vec![
            Cell::text(record.suite_name.clone(), style),
            Cell::text(record.test_name.clone(), style),
            Cell::text(record.status.as_str(), style),
            Cell::text(record.error.clone(), style),
        ];

        let embedded = match &self.embedder {
            Some(embedder) => {
                // The path itself is never shown, only the image
                cells.push(Cell::blank(style));
                if record.has_screenshot() {
                    embedder.embed(
                        &record.screenshot_path,
                        row_index,
                        SCREENSHOT_COLUMN,
                        diagnostics,
                    )
                } else {
                    embedder.short_row()
                }
            }
            None => EmbeddedRow {
                image: None,
                row_height: self.layout.short_row_height,
            },
        };

        (
            Row {
                cells,
                height: Some(embedded.row_height),
            },
            embedded.image,
        )
    }
}
