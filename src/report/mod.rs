pub mod diagnostics;
pub mod embed;
pub mod ingest;
pub mod layout;
pub mod normalizer;
pub mod results_sheet;
pub mod sink;
pub mod styles;
pub mod summary;
pub mod types;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::utils::config::ReportConfig;
use diagnostics::Diagnostics;
use embed::{FsImageSource, ImageSource, ScreenshotEmbedder};
use ingest::Ingestor;
use layout::WorkbookLayout;
use normalizer::Normalizer;
use results_sheet::ResultsSheetBuilder;
use sink::{WorkbookSink, XlsxSink};
use styles::StyleRegistry;
use types::{ResultRecord, SummaryStat};

/// Everything produced by one conversion run
#[derive(Debug, Default)]
pub struct ConversionOutcome {
    pub records: Vec<ResultRecord>,
    pub stats: Vec<SummaryStat>,
    pub workbook: WorkbookLayout,
    /// Set once the workbook has been written
    pub written_to: Option<PathBuf>,
    pub diagnostics: Diagnostics,
}

impl ConversionOutcome {
    pub fn succeeded(&self) -> bool {
        self.written_to.is_some()
    }
}

/// Converts a folder of runner JSON files into an Excel report.
pub struct ReportConverter {
    config: ReportConfig,
    styles: StyleRegistry,
    images: Box<dyn ImageSource + Send + Sync>,
    sink: Box<dyn WorkbookSink + Send + Sync>,
}

impl ReportConverter {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            styles: StyleRegistry::new(),
            images: Box::new(FsImageSource),
            sink: Box::new(XlsxSink),
        }
    }

    pub fn with_image_source(mut self, images: impl ImageSource + Send + Sync + 'static) -> Self {
        self.images = Box::new(images);
        self
    }

    pub fn with_sink(mut self, sink: impl WorkbookSink + Send + Sync + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Read `dir` and produce the workbook layout without writing anything.
    pub async fn build(&self, dir: &Path) -> Result<ConversionOutcome> {
        let ingestor = Ingestor::new(Normalizer::new(self.config.sanitize_errors));
        let ingested = ingestor.ingest_dir(dir).await?;
        let mut diagnostics = ingested.diagnostics;
        let records = ingested.records;

        let stats = summary::calculate_summary_stats(&records);
        let workbook = self.build_workbook(&records, &stats, &mut diagnostics);

        Ok(ConversionOutcome {
            records,
            stats,
            workbook,
            written_to: None,
            diagnostics,
        })
    }

    /// Lay out both sheets for an already ingested record list and its stats.
    pub fn build_workbook(
        &self,
        records: &[ResultRecord],
        stats: &[SummaryStat],
        diagnostics: &mut Diagnostics,
    ) -> WorkbookLayout {
        let layout = &self.config.layout;
        let embedder = self
            .config
            .bind_screenshots
            .then(|| ScreenshotEmbedder::new(&*self.images, layout));

        let results = ResultsSheetBuilder::new(&self.styles, layout, embedder)
            .build(records, diagnostics);
        let summary = summary::build_summary_sheet(stats, &self.styles, layout);

        WorkbookLayout {
            sheets: vec![results, summary],
        }
    }

    /// Full conversion: ingest, lay out and write the workbook.
    ///
    /// Never fails. Anything that goes wrong is logged and recorded in the
    /// returned diagnostics, and whatever could be produced is kept.
    pub async fn convert_folder(&self, dir: &Path) -> ConversionOutcome {
        let mut outcome = match self.build(dir).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let mut outcome = ConversionOutcome::default();
                outcome
                    .diagnostics
                    .error(format!("Error converting JSON to Excel: {:#}", e));
                return outcome;
            }
        };

        let path = &self.config.output_path;
        match self.sink.save(&outcome.workbook, path) {
            Ok(()) => {
                log::info!("Excel report successfully written to {}", path.display());
                outcome.written_to = Some(path.clone());
            }
            Err(e) => outcome
                .diagnostics
                .error(format!("Error writing Excel report: {}", e)),
        }

        outcome
    }
}

/// Convert `dir` to an Excel report at `output_path`.
///
/// `bind_screenshots` enables image embedding when it equals "Yes" (any case).
pub async fn convert_json_folder_to_excel(
    dir: &Path,
    output_path: &Path,
    bind_screenshots: &str,
) -> ConversionOutcome {
    ReportConverter::new(ReportConfig::new(output_path, bind_screenshots))
        .convert_folder(dir)
        .await
}

/// Ingest `dir` and write only `<summary_dir>/test-summary.txt`.
pub async fn summarize_folder(dir: &Path, summary_dir: &Path) -> Result<PathBuf> {
    let ingested = Ingestor::default().ingest_dir(dir).await?;
    let stats = summary::calculate_summary_stats(&ingested.records);
    summary::write_summary_text(&stats, summary_dir)
}
