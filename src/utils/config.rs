use std::path::PathBuf;

/// Fixed geometry of the generated sheets
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Row height for rows without an embedded screenshot
    pub short_row_height: f64,

    /// Row height for rows carrying a screenshot
    pub tall_row_height: f64,

    /// Rendered screenshot size in pixels
    pub image_width: u32,
    pub image_height: u32,

    /// Column widths of "Test Results": suite, test, status, error, screenshot
    pub result_column_widths: [f64; 5],

    /// Column widths of "Summary": metric, value
    pub summary_column_widths: [f64; 2],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            short_row_height: 20.0,
            tall_row_height: 160.0,
            image_width: 300,
            image_height: 160,
            result_column_widths: [25.0, 40.0, 10.0, 60.0, 40.0],
            summary_column_widths: [25.0, 15.0],
        }
    }
}

/// Settings for one report conversion
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Workbook destination
    pub output_path: PathBuf,

    /// Embed screenshot images in the results sheet
    pub bind_screenshots: bool,

    /// Strip ANSI codes and keep only the first line of error messages
    pub sanitize_errors: bool,

    pub layout: LayoutConfig,
}

impl ReportConfig {
    /// `bind_screenshots` follows the runner convention: "Yes" in any case enables it.
    pub fn new(output_path: impl Into<PathBuf>, bind_screenshots: &str) -> Self {
        Self {
            output_path: output_path.into(),
            bind_screenshots: parse_yes_flag(bind_screenshots),
            sanitize_errors: false,
            layout: LayoutConfig::default(),
        }
    }

    pub fn with_sanitized_errors(mut self, sanitize: bool) -> Self {
        self.sanitize_errors = sanitize;
        self
    }
}

pub fn parse_yes_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("yes")
}
