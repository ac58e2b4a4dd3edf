use std::fmt;

/// Test outcome as reported by the runner.
///
/// Only `PASSED` and `FAILED` carry meaning for styling and counting; any other
/// value is kept verbatim so it renders exactly as the runner wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestStatus {
    Passed,
    Failed,
    Other(String),
}

impl TestStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PASSED" => TestStatus::Passed,
            "FAILED" => TestStatus::Failed,
            other => TestStatus::Other(other.to_string()),
        }
    }

    pub fn unknown() -> Self {
        TestStatus::Other("UNKNOWN".to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
            TestStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized test outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub suite_name: String,
    pub test_name: String,
    pub status: TestStatus,
    pub error: String,
    pub screenshot_path: String,
}

impl ResultRecord {
    pub fn has_screenshot(&self) -> bool {
        !self.screenshot_path.is_empty()
    }
}

/// A single row of the summary sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryStat {
    pub metric: String,
    pub value: u64,
}

impl SummaryStat {
    pub fn new(metric: &str, value: u64) -> Self {
        Self {
            metric: metric.to_string(),
            value,
        }
    }
}
