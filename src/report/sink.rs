//! Serialization of a [`WorkbookLayout`] into an `.xlsx` file.

use super::layout::{CellValue, SheetLayout, WorkbookLayout};
use super::styles::{BorderWeight, CellStyle, HorizontalAlign, VerticalAlign};
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatPattern, Image, Workbook, Worksheet,
    XlsxError,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to build sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: XlsxError,
    },

    #[error("failed to write workbook to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },
}

/// Anything that can persist a workbook layout
pub trait WorkbookSink {
    fn save(&self, workbook: &WorkbookLayout, path: &Path) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxSink;

impl WorkbookSink for XlsxSink {
    fn save(&self, layout: &WorkbookLayout, path: &Path) -> Result<(), SinkError> {
        let mut workbook = Workbook::new();

        for sheet in &layout.sheets {
            let worksheet = workbook.add_worksheet();
            write_sheet(worksheet, sheet).map_err(|source| SinkError::Sheet {
                sheet: sheet.name.clone(),
                source,
            })?;
        }

        workbook.save(path).map_err(|source| SinkError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &SheetLayout) -> Result<(), XlsxError> {
    worksheet.set_name(&sheet.name)?;

    for (col, column) in sheet.columns.iter().enumerate() {
        worksheet.set_column_width(col as u16, column.width)?;
    }

    for (row_num, row) in sheet.rows.iter().enumerate() {
        let row_num = row_num as u32;
        for (col, cell) in row.cells.iter().enumerate() {
            write_value(worksheet, row_num, col as u16, &cell.value, &to_format(&cell.style))?;
        }
        if let Some(height) = row.height {
            worksheet.set_row_height(row_num, height)?;
        }
    }

    for merge in &sheet.merges {
        let label = cell_text(sheet, merge.first_row, merge.col);
        let format = to_format(&merge.style);

        if merge.is_single_cell() {
            worksheet.write_string_with_format(merge.first_row, merge.col, label, &format)?;
            continue;
        }

        worksheet.merge_range(
            merge.first_row,
            merge.col,
            merge.last_row,
            merge.col,
            label,
            &format,
        )?;

        // Keep the per-row values underneath the merged block
        for row_num in merge.first_row + 1..=merge.last_row {
            if let Some(cell) = sheet
                .rows
                .get(row_num as usize)
                .and_then(|r| r.cells.get(merge.col as usize))
            {
                write_value(worksheet, row_num, merge.col, &cell.value, &to_format(&cell.style))?;
            }
        }
    }

    for anchor in &sheet.images {
        let image = match Image::new_from_buffer(&anchor.png) {
            Ok(image) => image.set_scale_to_size(
                anchor.width as f64,
                anchor.height as f64,
                false,
            ),
            Err(e) => {
                log::error!(
                    "Skipping screenshot for row {} in '{}': {}",
                    anchor.row,
                    sheet.name,
                    e
                );
                continue;
            }
        };
        worksheet.insert_image(anchor.row, anchor.col, &image)?;
    }

    if sheet.frozen_rows > 0 {
        worksheet.set_freeze_panes(sheet.frozen_rows, 0)?;
    }

    Ok(())
}

fn cell_text(sheet: &SheetLayout, row: u32, col: u16) -> &str {
    sheet
        .rows
        .get(row as usize)
        .and_then(|r| r.cells.get(col as usize))
        .and_then(|c| c.as_text())
        .unwrap_or("")
}

fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: &Format,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Text(s) => worksheet.write_string_with_format(row, col, s, format)?,
        CellValue::Number(n) => worksheet.write_number_with_format(row, col, *n, format)?,
        CellValue::Blank => worksheet.write_blank(row, col, format)?,
    };
    Ok(())
}

pub fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if let Some(name) = style.font_name {
        format = format.set_font_name(name);
    }
    if style.bold == Some(true) {
        format = format.set_bold();
    }
    if let Some(color) = style.font_color {
        format = format.set_font_color(Color::RGB(color));
    }
    if let Some(fill) = style.fill {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(fill));
    }
    if let Some(border) = style.border {
        let weight = match border.weight {
            BorderWeight::Thin => FormatBorder::Thin,
            BorderWeight::Medium => FormatBorder::Medium,
        };
        format = format
            .set_border(weight)
            .set_border_color(Color::RGB(border.color));
    }
    if let Some(align) = style.horizontal {
        format = format.set_align(match align {
            HorizontalAlign::Center => FormatAlign::Center,
        });
    }
    if let Some(align) = style.vertical {
        format = format.set_align(match align {
            VerticalAlign::Middle => FormatAlign::VerticalCenter,
        });
    }
    if style.wrap_text == Some(true) {
        format = format.set_text_wrap();
    }

    format
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::{Cell, Column, MergeRange, Row};
    use crate::report::styles::{StyleName, StyleRegistry};

    fn sheet_with_merge(first_row: u32, last_row: u32) -> SheetLayout {
        let styles = StyleRegistry::new();
        let cell_style = *styles.get(StyleName::BorderedCell);
        let mut sheet = SheetLayout::new(
            "Test Results",
            vec![Column {
                header: "Suite Name".to_string(),
                width: 25.0,
            }],
        );
        sheet.rows.push(Row {
            cells: vec![Cell::text("Suite Name", *styles.get(StyleName::Header))],
            height: None,
        });
        for _ in 0..3 {
            sheet.rows.push(Row {
                cells: vec![Cell::text("A", cell_style)],
                height: Some(20.0),
            });
        }
        sheet.merges.push(MergeRange {
            first_row,
            last_row,
            col: 0,
            style: *styles.get(StyleName::SuiteLabel),
        });
        sheet.frozen_rows = 1;
        sheet
    }

    #[test]
    fn test_writes_multi_and_single_row_blocks() {
        let dir = tempfile::tempdir().unwrap();
        for (first, last) in [(1, 3), (2, 2)] {
            let path = dir.path().join(format!("merge-{}-{}.xlsx", first, last));
            let layout = WorkbookLayout {
                sheets: vec![sheet_with_merge(first, last)],
            };
            XlsxSink.save(&layout, &path).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_write_failure_is_typed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("report.xlsx");
        let layout = WorkbookLayout {
            sheets: vec![sheet_with_merge(1, 3)],
        };
        assert!(matches!(
            XlsxSink.save(&layout, &path),
            Err(SinkError::Write { .. })
        ));
    }
}
