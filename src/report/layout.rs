//! In-memory description of the workbook handed to a [`WorkbookSink`](super::sink::WorkbookSink).
//!
//! Rows and columns are 0-based, so the header is row 0 and the first record is row 1.

use super::styles::CellStyle;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

impl Cell {
    pub fn text(value: impl Into<String>, style: CellStyle) -> Self {
        Self {
            value: CellValue::Text(value.into()),
            style,
        }
    }

    pub fn number(value: f64, style: CellStyle) -> Self {
        Self {
            value: CellValue::Number(value),
            style,
        }
    }

    pub fn blank(style: CellStyle) -> Self {
        Self {
            value: CellValue::Blank,
            style,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
    /// `None` keeps the application default height
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub width: f64,
}

/// Vertical merge over a single column. `first_row == last_row` is a one-row block.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeRange {
    pub first_row: u32,
    pub last_row: u32,
    pub col: u16,
    pub style: CellStyle,
}

impl MergeRange {
    pub fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row
    }
}

/// PNG image anchored at the top-left corner of a cell
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnchor {
    pub row: u32,
    pub col: u16,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub merges: Vec<MergeRange>,
    pub images: Vec<ImageAnchor>,
    pub frozen_rows: u32,
}

impl SheetLayout {
    pub fn new(name: &str, columns: Vec<Column>) -> Self {
        Self {
            name: name.to_string(),
            columns,
            rows: Vec::new(),
            merges: Vec::new(),
            images: Vec::new(),
            frozen_rows: 0,
        }
    }

    /// Rows after the header
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkbookLayout {
    pub sheets: Vec<SheetLayout>,
}

impl WorkbookLayout {
    pub fn sheet(&self, name: &str) -> Option<&SheetLayout> {
        self.sheets.iter().find(|s| s.name == name)
    }
}
