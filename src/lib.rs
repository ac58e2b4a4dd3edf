pub mod report;
pub mod utils;

// Re-export common items
pub use report::{convert_json_folder_to_excel, ConversionOutcome, ReportConverter};
pub use utils::config::ReportConfig;
