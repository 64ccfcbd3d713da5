//! Builder methods available for all states
//!
//! This module contains methods that can be called on the builder
//! regardless of its current type state.

use std::path::PathBuf;

use super::builder::HarvestConfigBuilder;

impl<State> HarvestConfigBuilder<State> {
    /// Set browser headless mode (visible vs invisible browser window)
    ///
    /// Headed mode is only honoured in debug builds; release builds force
    /// headless with a warning.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn launch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.launch_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.config.navigation_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn content_timeout_secs(mut self, secs: u64) -> Self {
        self.config.content_timeout_secs = secs;
        self
    }

    /// Set the sleep before each content poll
    ///
    /// Zero is allowed and polls back to back, which is mostly useful in tests.
    #[must_use]
    pub fn poll_interval_secs(mut self, secs: u64) -> Self {
        self.config.poll_interval_secs = secs;
        self
    }

    #[must_use]
    pub fn max_poll_attempts(mut self, attempts: u32) -> Self {
        self.config.max_poll_attempts = attempts;
        self
    }

    /// Limit how many pipelines run at once
    #[must_use]
    pub fn max_concurrent_pages(mut self, limit: usize) -> Self {
        self.config.max_concurrent_pages = Some(limit);
        self
    }

    /// Launch every URL's pipeline at once
    ///
    /// Every pipeline owns a Chrome process; on large inputs this can
    /// exhaust memory and file handles.
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.config.max_concurrent_pages = None;
        self
    }

    #[must_use]
    pub fn min_image_height(mut self, height: u32) -> Self {
        self.config.min_image_height = height;
        self
    }

    #[must_use]
    pub fn image_timeout_secs(mut self, secs: u64) -> Self {
        self.config.image_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn max_image_bytes(mut self, bytes: usize) -> Self {
        self.config.max_image_bytes = bytes;
        self
    }

    #[must_use]
    pub fn thumbnail_size(mut self, size: u32) -> Self {
        self.config.thumbnail_size = size;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.chrome_data_dir = dir;
        self
    }

    #[must_use]
    pub fn browser_executable(mut self, path: Option<PathBuf>) -> Self {
        self.config.browser_executable = path;
        self
    }
}
