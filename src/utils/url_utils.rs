//! URL and input-list utilities.
//!
//! This module provides functions for reading the batch input file and
//! resolving image references found on product pages.

use anyhow::{Context, Result};
use std::path::Path;
use url::Url;

/// Resolve a potentially relative URL against a base URL
pub fn resolve_url(base_url: &str, reference: &str) -> Result<String> {
    let base = Url::parse(base_url).context("Invalid base URL")?;
    let resolved = base.join(reference).context("Failed to resolve URL")?;
    Ok(resolved.to_string())
}

/// Check if a URL is valid
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Parse a newline-delimited URL list
///
/// Lines are trimmed; blank lines and `#` comments are skipped. Order is
/// preserved and duplicates are left for the orchestrator to report.
#[must_use]
pub fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// Read the batch input file into an ordered list of URLs
pub async fn load_url_list(path: &Path) -> Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read URL list from {}", path.display()))?;

    let urls = parse_url_list(&contents);
    for url in &urls {
        if !is_valid_url(url) {
            log::warn!("Input line is not an absolute http(s) URL, it will fail to load: {url}");
        }
    }

    Ok(urls)
}

/// Timestamp used to give every run's output files a unique name
#[must_use]
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
}
