pub mod batch;
pub mod browser_setup;
pub mod config;
pub mod image_extractor;
pub mod image_validator;
pub mod page_fetcher;
pub mod report;
pub mod result_store;
pub mod utils;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub use batch::{BatchOrchestrator, LogProgress, NoOpProgress, ProgressReporter};
pub use browser_setup::{
    download_managed_browser, find_browser_executable, launch_browser, resolve_browser_executable,
};
pub use config::HarvestConfig;
pub use image_extractor::{ImageCandidate, extract};
pub use image_validator::{ImageValidator, is_valid_image};
pub use page_fetcher::{
    BrowserLauncher, BrowserSession, ChromiumLauncher, FailureReason, FetchError, FetchOutcome,
    FetchState, PageFetcher, RenderedPage,
};
pub use report::{ReportBuilder, ReportError, ReportRow, save_json_summary, write_csv_report};
pub use result_store::{RecordStatus, ResultRecord, ResultStore};
pub use utils::{load_url_list, run_timestamp};

/// Files produced by one run
#[derive(Debug, Clone)]
pub struct HarvestOutput {
    pub report_path: PathBuf,
    pub summary_path: PathBuf,
    pub rows: Vec<ReportRow>,
}

impl HarvestOutput {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.status == RecordStatus::Success)
            .count()
    }
}

/// Run the whole batch with real Chrome sessions and write the report
///
/// Only setup problems (unwritable output, HTTP client) are errors; per-URL
/// failures end up as rows with a failure marker.
pub async fn harvest(config: &HarvestConfig, urls: &[String]) -> Result<HarvestOutput> {
    let timestamp = run_timestamp();

    let snapshot = BatchOrchestrator::from_config(ChromiumLauncher::from_config(config), config)
        .with_progress(LogProgress::new())
        .run(urls)
        .await;

    let summary_path = save_json_summary(&snapshot, config.output_dir(), &timestamp)
        .await
        .context("Failed to save JSON summary")?;

    let rows = ReportBuilder::from_config(config, &timestamp)?
        .build(urls, &snapshot)
        .await
        .context("Failed to assemble report")?;

    let report_path = write_csv_report(&rows, config.output_dir(), &timestamp)
        .context("Failed to write CSV report")?;

    Ok(HarvestOutput {
        report_path,
        summary_path,
        rows,
    })
}
