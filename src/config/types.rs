//! Core configuration types for image harvesting
//!
//! This module contains the main `HarvestConfig` struct that defines the
//! timing, concurrency and validation parameters of a batch run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{
    DEFAULT_CONTENT_TIMEOUT_SECS, DEFAULT_IMAGE_TIMEOUT_SECS, DEFAULT_LAUNCH_TIMEOUT_SECS,
    DEFAULT_MAX_CONCURRENT_PAGES, DEFAULT_MAX_IMAGE_BYTES, DEFAULT_MAX_POLL_ATTEMPTS,
    DEFAULT_MIN_IMAGE_HEIGHT, DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_THUMBNAIL_SIZE,
};

/// Main configuration struct for a harvesting batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Directory receiving the CSV report, thumbnails and JSON summary
    pub(crate) output_dir: PathBuf,
    pub(crate) headless: bool,

    /// Timeout in seconds for starting a browser session
    pub(crate) launch_timeout_secs: u64,

    /// Timeout in seconds for navigating to the product page
    ///
    /// Default: 10 seconds
    pub(crate) navigation_timeout_secs: u64,

    /// Timeout in seconds for a single rendered-content pull
    ///
    /// A content pull that exceeds this ends polling for the URL; it is
    /// not retried.
    ///
    /// Default: 5 seconds
    pub(crate) content_timeout_secs: u64,

    /// Sleep in seconds before every content poll
    ///
    /// Default: 3 seconds
    pub(crate) poll_interval_secs: u64,

    /// Total content polls before giving up on a page with no image tag
    ///
    /// Default: 6
    pub(crate) max_poll_attempts: u32,

    /// Maximum number of pipelines (and therefore browser processes) alive at once
    ///
    /// `None` launches every URL at once.
    /// Default: 4
    pub(crate) max_concurrent_pages: Option<usize>,

    /// Minimum decoded height, in pixels, for an image to be reported
    pub(crate) min_image_height: u32,

    pub(crate) image_timeout_secs: u64,
    pub(crate) max_image_bytes: usize,
    pub(crate) thumbnail_size: u32,

    /// Root for per-session Chrome profile directories
    ///
    /// Each session creates (and on release deletes) a unique child
    /// directory, so no cookies or storage survive between URLs.
    #[serde(skip)]
    pub(crate) chrome_data_dir: Option<PathBuf>,

    /// Browser executable to launch; discovered (or downloaded) when `None`
    #[serde(skip)]
    pub(crate) browser_executable: Option<PathBuf>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            headless: true,
            launch_timeout_secs: DEFAULT_LAUNCH_TIMEOUT_SECS,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            content_timeout_secs: DEFAULT_CONTENT_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            max_concurrent_pages: Some(DEFAULT_MAX_CONCURRENT_PAGES),
            min_image_height: DEFAULT_MIN_IMAGE_HEIGHT,
            image_timeout_secs: DEFAULT_IMAGE_TIMEOUT_SECS,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            chrome_data_dir: None,
            browser_executable: None,
        }
    }
}
