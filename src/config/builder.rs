//! Type-safe builder for `HarvestConfig` using the typestate pattern
//!
//! The output directory is the only required field; `build()` only exists
//! once it has been set.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::HarvestConfig;

// Type states for the builder
pub struct WithOutputDir;

pub struct HarvestConfigBuilder<State = ()> {
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) config: HarvestConfig,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for HarvestConfigBuilder<()> {
    fn default() -> Self {
        Self {
            output_dir: None,
            config: HarvestConfig::default(),
            _phantom: PhantomData,
        }
    }
}

impl HarvestConfig {
    /// Create a builder for configuring a `HarvestConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> HarvestConfigBuilder<()> {
        HarvestConfigBuilder::default()
    }
}

impl HarvestConfigBuilder<()> {
    pub fn output_dir(self, dir: impl Into<PathBuf>) -> HarvestConfigBuilder<WithOutputDir> {
        HarvestConfigBuilder {
            output_dir: Some(dir.into()),
            config: self.config,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl HarvestConfigBuilder<WithOutputDir> {
    pub fn build(self) -> Result<HarvestConfig> {
        let mut config = self.config;
        config.output_dir = self
            .output_dir
            .ok_or_else(|| anyhow!("output_dir is required"))?;

        if config.launch_timeout_secs == 0 {
            return Err(anyhow!("launch_timeout_secs must be at least 1"));
        }
        if config.navigation_timeout_secs == 0 {
            return Err(anyhow!("navigation_timeout_secs must be at least 1"));
        }
        if config.content_timeout_secs == 0 {
            return Err(anyhow!("content_timeout_secs must be at least 1"));
        }
        if config.max_poll_attempts == 0 {
            return Err(anyhow!("max_poll_attempts must be at least 1"));
        }
        if config.max_concurrent_pages == Some(0) {
            return Err(anyhow!(
                "max_concurrent_pages must be at least 1 (use unbounded() to lift the limit)"
            ));
        }
        if config.thumbnail_size == 0 {
            return Err(anyhow!("thumbnail_size must be at least 1"));
        }

        // Enforce headless mode in release builds for production safety
        #[cfg(not(debug_assertions))]
        let headless = if !config.headless {
            tracing::warn!(
                "Forcing headless mode in release build. \
                Headed mode is only available in debug builds for development."
            );
            true
        } else {
            config.headless
        };

        #[cfg(debug_assertions)]
        let headless = config.headless;

        config.headless = headless;

        if config.max_concurrent_pages.is_none() {
            tracing::warn!(
                "Concurrency is unbounded: every URL will launch its own browser at once"
            );
        }

        Ok(config)
    }
}
