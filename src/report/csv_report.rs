//! Tabular report output

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::ReportRow;
use super::errors::{ReportError, ReportResult};

/// Separator between thumbnail paths in the `thumbnails` column
pub const THUMBNAIL_SEPARATOR: &str = "|";

#[derive(Serialize)]
struct CsvRow<'a> {
    url: &'a str,
    status: &'static str,
    image_count: usize,
    thumbnails: String,
}

/// File name of the report for a run
#[must_use]
pub fn report_file_name(timestamp: &str) -> String {
    format!("product_images_{timestamp}.csv")
}

/// Write one row per URL to `product_images_<timestamp>.csv` in `output_dir`
///
/// Returns the path of the written file.
pub fn write_csv_report(
    rows: &[ReportRow],
    output_dir: &Path,
    timestamp: &str,
) -> ReportResult<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|e| ReportError::io(output_dir, e))?;
    let path = output_dir.join(report_file_name(timestamp));

    let mut writer = csv::Writer::from_path(&path)?;
    for row in rows {
        let thumbnails = row
            .thumbnails
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect::<Vec<_>>()
            .join(THUMBNAIL_SEPARATOR);

        writer.serialize(CsvRow {
            url: &row.url,
            status: row.status.label(),
            image_count: row.image_count(),
            thumbnails,
        })?;
    }
    writer.flush().map_err(|e| ReportError::io(&path, e))?;

    info!("Wrote report with {} rows to {}", rows.len(), path.display());
    Ok(path)
}
