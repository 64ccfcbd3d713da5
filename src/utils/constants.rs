//! Shared configuration constants for imagescrape
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default outer timeout for page navigation: 10 seconds
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 10;

/// Default timeout for starting a browser session: 60 seconds
///
/// Covers a first-run download of the managed Chromium build.
pub const DEFAULT_LAUNCH_TIMEOUT_SECS: u64 = 60;

/// Default inner timeout for a single rendered-content pull: 5 seconds
pub const DEFAULT_CONTENT_TIMEOUT_SECS: u64 = 5;

/// Default sleep before each content poll: 3 seconds
///
/// Gives lazy-load scripts on product pages time to swap placeholder
/// images for the real ones before the markup is captured.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

/// Default number of content polls per page (first pull plus five retries)
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 6;

/// Default bound on concurrently running pipelines
///
/// Each pipeline owns a full Chrome process, so this is effectively a
/// cap on browser processes alive at once.
pub const DEFAULT_MAX_CONCURRENT_PAGES: usize = 4;

/// Minimum decoded image height accepted by the validator
pub const DEFAULT_MIN_IMAGE_HEIGHT: u32 = 200;

/// Default per-image download timeout: 30 seconds
pub const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 30;

/// Maximum size for image downloads (bytes)
///
/// Product detail images are usually 100KB-2MB. Anything past 10MB is
/// almost certainly not a thumbnail candidate.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Longest side of generated report thumbnails, in pixels
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 160;

/// Marker that indicates the rendered markup contains at least one image tag
pub const IMAGE_TAG_MARKER: &str = "<img";

/// Chrome user agent string for stealth mode
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
