//! Getter methods for `HarvestConfig`

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::HarvestConfig;

impl HarvestConfig {
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_secs(self.launch_timeout_secs)
    }

    #[must_use]
    pub fn navigation_timeout_secs(&self) -> u64 {
        self.navigation_timeout_secs
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    #[must_use]
    pub fn content_timeout_secs(&self) -> u64 {
        self.content_timeout_secs
    }

    #[must_use]
    pub fn content_timeout(&self) -> Duration {
        Duration::from_secs(self.content_timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub fn max_poll_attempts(&self) -> u32 {
        self.max_poll_attempts
    }

    #[must_use]
    pub fn max_concurrent_pages(&self) -> Option<usize> {
        self.max_concurrent_pages
    }

    #[must_use]
    pub fn min_image_height(&self) -> u32 {
        self.min_image_height
    }

    #[must_use]
    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }

    #[must_use]
    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    #[must_use]
    pub fn thumbnail_size(&self) -> u32 {
        self.thumbnail_size
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }

    #[must_use]
    pub fn browser_executable(&self) -> Option<&PathBuf> {
        self.browser_executable.as_ref()
    }
}
