//! Reads runner output files from a directory into an ordered record list.

use super::diagnostics::Diagnostics;
use super::normalizer::{Normalizer, RawRecord};
use super::types::ResultRecord;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Top-level layout of a results file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum JsonShape {
    /// `[ {..}, {..} ]`
    Records(Vec<Value>),
    /// `{ "testResults": [ {..}, {..} ] }`
    Nested {
        #[serde(rename = "testResults")]
        test_results: Vec<Value>,
    },
    Unrecognized(Value),
}

impl JsonShape {
    pub fn classify(value: Value) -> Self {
        // The last variant accepts any value, so this cannot fail
        serde_json::from_value(value).unwrap_or(JsonShape::Unrecognized(Value::Null))
    }

    pub fn into_entries(self) -> Option<Vec<Value>> {
        match self {
            JsonShape::Records(entries) => Some(entries),
            JsonShape::Nested { test_results } => Some(test_results),
            JsonShape::Unrecognized(_) => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Ingested {
    pub records: Vec<ResultRecord>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ingestor {
    normalizer: Normalizer,
}

impl Ingestor {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// Ingest every `*.json` file in `dir`, in listing order.
    ///
    /// Only a failure to list the directory is returned as an error. Problems with
    /// individual files end up in [`Ingested::diagnostics`] and the file is skipped.
    pub async fn ingest_dir(&self, dir: &Path) -> Result<Ingested> {
        let files = list_json_files(dir).await?;
        let mut ingested = Ingested::default();

        for path in files {
            let file_name = display_name(&path);
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    ingested
                        .diagnostics
                        .warn(format!("Failed to read {}: {}", file_name, e));
                    continue;
                }
            };
            let before = ingested.records.len();
            self.ingest_content(&file_name, &content, &mut ingested);
            log::debug!(
                "Ingested {} records from {}",
                ingested.records.len() - before,
                file_name
            );
        }

        Ok(ingested)
    }

    /// Parse one file's content and append its records.
    pub fn ingest_content(&self, file_name: &str, content: &str, ingested: &mut Ingested) {
        let value: Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                ingested
                    .diagnostics
                    .warn(format!("Invalid JSON in file {}: {}", file_name, e));
                return;
            }
        };

        let Some(entries) = JsonShape::classify(value).into_entries() else {
            ingested
                .diagnostics
                .warn(format!("Unexpected JSON structure in file: {}", file_name));
            return;
        };

        for (index, entry) in entries.into_iter().enumerate() {
            if !entry.is_object() {
                ingested.diagnostics.warn(format!(
                    "Skipping entry {} in {}: not a test result object",
                    index, file_name
                ));
                continue;
            }
            match serde_json::from_value::<RawRecord>(entry) {
                Ok(raw) => ingested.records.push(self.normalizer.normalize(&raw)),
                Err(e) => ingested.diagnostics.warn(format!(
                    "Skipping entry {} in {}: {}",
                    index, file_name, e
                )),
            }
        }
    }
}

/// Entries of `dir` whose name ends in `.json`, sorted by file name.
pub async fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to list directory {}", dir.display()))?
    {
        if entry.file_name().to_string_lossy().ends_with(".json") {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
