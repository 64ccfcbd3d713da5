//! Raw per-URL outcome dump for auditing

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use super::errors::{ReportError, ReportResult};
use crate::result_store::ResultRecord;

/// Write the snapshot as pretty JSON to `results_<timestamp>.json`
///
/// Records are keyed and sorted by URL so two runs diff cleanly.
pub async fn save_json_summary(
    snapshot: &HashMap<String, ResultRecord>,
    output_dir: &Path,
    timestamp: &str,
) -> ReportResult<PathBuf> {
    let sorted: BTreeMap<&str, &ResultRecord> = snapshot
        .iter()
        .map(|(url, record)| (url.as_str(), record))
        .collect();
    let json = serde_json::to_string_pretty(&sorted)?;

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| ReportError::io(output_dir, e))?;

    let path = output_dir.join(format!("results_{timestamp}.json"));
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| ReportError::io(&path, e))?;

    log::info!("Saved JSON summary to {}", path.display());
    Ok(path)
}
