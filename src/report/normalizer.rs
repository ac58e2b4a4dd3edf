//! Turns raw runner entries into [`ResultRecord`]s.

use super::types::{ResultRecord, TestStatus};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

pub const DEFAULT_SUITE_NAME: &str = "Default Suite";

/// Runner entry as found in the JSON files. Every field is optional and untyped.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub suite_name: Option<Value>,
    pub test_name: Option<Value>,
    pub status: Option<Value>,
    pub error: Option<Value>,
    pub screenshot: Option<Value>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    pub sanitize_errors: bool,
}

impl Normalizer {
    pub fn new(sanitize_errors: bool) -> Self {
        Self { sanitize_errors }
    }

    pub fn normalize(&self, raw: &RawRecord) -> ResultRecord {
        let suite_name =
            text(&raw.suite_name).unwrap_or_else(|| DEFAULT_SUITE_NAME.to_string());
        let status = text(&raw.status)
            .map(|s| TestStatus::parse(&s))
            .unwrap_or_else(TestStatus::unknown);
        let error = text(&raw.error).unwrap_or_default();
        let error = if self.sanitize_errors {
            sanitize_error_message(&error)
        } else {
            error
        };

        ResultRecord {
            suite_name: remove_suite_suffix(&suite_name),
            test_name: text(&raw.test_name).unwrap_or_default(),
            status,
            error,
            screenshot_path: text(&raw.screenshot).unwrap_or_default(),
        }
    }
}

/// Render a JSON field as text. Absent, null and empty values count as missing.
fn text(value: &Option<Value>) -> Option<String> {
    let rendered = match value.as_ref()? {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if rendered.is_empty() {
        None
    } else {
        Some(rendered)
    }
}

fn suite_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)suite[0-9]+$").expect("static regex"))
}

fn ansi_sequence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\x1b\x{9b}]\[[0-9]{1,2}(;[0-9]{1,2})?(m|K)").expect("static regex")
    })
}

/// Strip a trailing `suiteNNN` token. Whitespace in front of it is kept.
pub fn remove_suite_suffix(suite_name: &str) -> String {
    suite_suffix().replace(suite_name, "").into_owned()
}

/// Drop ANSI colour codes and keep only the first trimmed line of an error.
pub fn sanitize_error_message(message: &str) -> String {
    let cleaned = ansi_sequence().replace_all(message, "");
    cleaned.lines().next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_suffix_stripping() {
        assert_eq!(remove_suite_suffix("Checkout suite3"), "Checkout ");
        assert_eq!(remove_suite_suffix("Checkout"), "Checkout");
        assert_eq!(remove_suite_suffix("Checkout SUITE12"), "Checkout ");
        assert_eq!(remove_suite_suffix("Login Suite2"), "Login ");
        assert_eq!(remove_suite_suffix("suite 2"), "suite 2");
        assert_eq!(remove_suite_suffix("Suite2 Login"), "Suite2 Login");
    }

    #[test]
    fn test_only_ascii_digits_form_a_suffix() {
        // Arabic-Indic three and fullwidth one
        assert_eq!(remove_suite_suffix("Login suite\u{0663}"), "Login suite\u{0663}");
        assert_eq!(remove_suite_suffix("Login Suite\u{FF11}"), "Login Suite\u{FF11}");
        assert_eq!(
            sanitize_error_message("\u{1b}[\u{0663}mred"),
            "\u{1b}[\u{0663}mred"
        );
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let record = Normalizer::default().normalize(&raw(json!({ "testName": "opens" })));
        assert_eq!(record.suite_name, DEFAULT_SUITE_NAME);
        assert_eq!(record.test_name, "opens");
        assert_eq!(record.status.as_str(), "UNKNOWN");
        assert_eq!(record.error, "");
        assert_eq!(record.screenshot_path, "");
    }

    #[test]
    fn test_empty_values_fall_back() {
        let record = Normalizer::default().normalize(&raw(json!({
            "suiteName": "",
            "status": "",
            "error": null
        })));
        assert_eq!(record.suite_name, DEFAULT_SUITE_NAME);
        assert_eq!(record.status, TestStatus::unknown());
        assert_eq!(record.test_name, "");
    }

    #[test]
    fn test_full_record() {
        let record = Normalizer::default().normalize(&raw(json!({
            "suiteName": "Payments suite7",
            "testName": "refund",
            "status": "FAILED",
            "error": "boom",
            "screenshot": "/tmp/shot.png"
        })));
        assert_eq!(record.suite_name, "Payments ");
        assert_eq!(record.status, TestStatus::Failed);
        assert_eq!(record.error, "boom");
        assert!(record.has_screenshot());
    }

    #[test]
    fn test_non_string_test_name_is_rendered() {
        let record = Normalizer::default().normalize(&raw(json!({ "testName": 42 })));
        assert_eq!(record.test_name, "42");
    }

    #[test]
    fn test_sanitize_error_message() {
        let message = "\u{1b}[31mExpected true\u{1b}[39m\n    at login.test.js:10";
        assert_eq!(sanitize_error_message(message), "Expected true");
        assert_eq!(sanitize_error_message(""), "");

        let record = Normalizer::new(true).normalize(&raw(json!({ "error": message })));
        assert_eq!(record.error, "Expected true");
    }
}
