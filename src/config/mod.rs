//! Configuration module for image harvesting
//!
//! This module provides the `HarvestConfig` struct and its type-safe builder
//! for configuring batch runs with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{HarvestConfigBuilder, WithOutputDir};
pub use types::HarvestConfig;
