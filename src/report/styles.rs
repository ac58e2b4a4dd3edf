//! Visual styles used by the report sheets.
//!
//! Styles are plain data. A [`StyleRegistry`] is built once per conversion and
//! handed to the sheet builders by reference; the workbook sink translates the
//! resolved [`CellStyle`]s into its own format objects.

/// Line weight of a cell border. All four sides always share the same weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderWeight {
    Thin,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub weight: BorderWeight,
    /// RGB colour
    pub color: u32,
}

pub const BORDER_COLOR: u32 = 0x000000;

impl Border {
    pub fn new(weight: BorderWeight) -> Self {
        Self {
            weight,
            color: BORDER_COLOR,
        }
    }
}

/// A partial cell style. Unset fields inherit from whatever it is layered on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellStyle {
    pub font_name: Option<&'static str>,
    pub bold: Option<bool>,
    pub font_color: Option<u32>,
    /// Solid fill colour (RGB)
    pub fill: Option<u32>,
    pub border: Option<Border>,
    pub horizontal: Option<HorizontalAlign>,
    pub vertical: Option<VerticalAlign>,
    pub wrap_text: Option<bool>,
}

impl CellStyle {
    /// `other` on top of `self`: fields set in `other` win.
    pub fn layered(&self, other: &CellStyle) -> CellStyle {
        CellStyle {
            font_name: other.font_name.or(self.font_name),
            bold: other.bold.or(self.bold),
            font_color: other.font_color.or(self.font_color),
            fill: other.fill.or(self.fill),
            border: other.border.or(self.border),
            horizontal: other.horizontal.or(self.horizontal),
            vertical: other.vertical.or(self.vertical),
            wrap_text: other.wrap_text.or(self.wrap_text),
        }
    }

    fn centered() -> CellStyle {
        CellStyle {
            horizontal: Some(HorizontalAlign::Center),
            vertical: Some(VerticalAlign::Middle),
            wrap_text: Some(true),
            ..CellStyle::default()
        }
    }

    fn solid(color: u32) -> CellStyle {
        CellStyle {
            fill: Some(color),
            ..CellStyle::default()
        }
    }

    fn banner(fill: u32) -> CellStyle {
        CellStyle {
            font_name: Some("Calibri"),
            bold: Some(true),
            font_color: Some(0xFFFFFF),
            fill: Some(fill),
            border: Some(Border::new(BorderWeight::Medium)),
            ..CellStyle::centered()
        }
    }
}

/// Names of the styles the registry knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleName {
    Header,
    SummaryHeader,
    PassedFill,
    FailedFill,
    SuiteLabel,
    /// Thin border, centred, wrapped. Applied to every result cell.
    BorderedCell,
    /// Calibri with thin border, centred, wrapped. Used by the summary rows.
    DataCell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRegistry {
    header: CellStyle,
    summary_header: CellStyle,
    passed_fill: CellStyle,
    failed_fill: CellStyle,
    suite_label: CellStyle,
    bordered_cell: CellStyle,
    data_cell: CellStyle,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self {
            header: CellStyle::banner(0x4F81BD),
            summary_header: CellStyle::banner(0x002060),
            passed_fill: CellStyle::solid(0xC6EFCE),
            failed_fill: CellStyle::solid(0xFFC7CE),
            suite_label: CellStyle {
                bold: Some(true),
                ..CellStyle::centered()
            },
            bordered_cell: CellStyle {
                border: Some(Border::new(BorderWeight::Thin)),
                ..CellStyle::centered()
            },
            data_cell: CellStyle {
                font_name: Some("Calibri"),
                bold: Some(false),
                border: Some(Border::new(BorderWeight::Thin)),
                ..CellStyle::centered()
            },
        }
    }

    pub fn get(&self, name: StyleName) -> &CellStyle {
        match name {
            StyleName::Header => &self.header,
            StyleName::SummaryHeader => &self.summary_header,
            StyleName::PassedFill => &self.passed_fill,
            StyleName::FailedFill => &self.failed_fill,
            StyleName::SuiteLabel => &self.suite_label,
            StyleName::BorderedCell => &self.bordered_cell,
            StyleName::DataCell => &self.data_cell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layering_prefers_top_style() {
        let styles = StyleRegistry::new();
        let row = styles
            .get(StyleName::BorderedCell)
            .layered(styles.get(StyleName::PassedFill));
        assert_eq!(row.fill, Some(0xC6EFCE));
        assert_eq!(row.border, Some(Border::new(BorderWeight::Thin)));
        assert_eq!(row.wrap_text, Some(true));
    }

    #[test]
    fn test_header_styles_use_medium_border() {
        let styles = StyleRegistry::new();
        for name in [StyleName::Header, StyleName::SummaryHeader] {
            let style = styles.get(name);
            assert_eq!(style.border.map(|b| b.weight), Some(BorderWeight::Medium));
            assert_eq!(style.bold, Some(true));
        }
        assert_ne!(
            styles.get(StyleName::Header).fill,
            styles.get(StyleName::SummaryHeader).fill
        );
    }
}
