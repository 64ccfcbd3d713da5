//! Tests for the type-safe configuration builder pattern

use kodegen_tools_imagescrape::config::HarvestConfig;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_builder_requires_output_dir() {
    // This should not compile if uncommented - output_dir is required
    // let config = HarvestConfig::builder().build();

    let temp_dir = TempDir::new().unwrap();
    let config = HarvestConfig::builder()
        .output_dir(temp_dir.path())
        .build()
        .unwrap();

    assert_eq!(config.output_dir(), temp_dir.path());
}

#[test]
fn test_builder_optional_fields_have_defaults() {
    let config = HarvestConfig::builder().output_dir("out").build().unwrap();

    assert!(config.headless());
    assert_eq!(config.navigation_timeout(), Duration::from_secs(10));
    assert_eq!(config.content_timeout(), Duration::from_secs(5));
    assert_eq!(config.poll_interval(), Duration::from_secs(3));
    assert_eq!(config.max_poll_attempts(), 6);
    assert_eq!(config.max_concurrent_pages(), Some(4));
    assert_eq!(config.min_image_height(), 200);
    assert_eq!(config.thumbnail_size(), 160);
    assert_eq!(config.chrome_data_dir(), None);
}

#[test]
fn test_builder_with_all_optional_fields() {
    let config = HarvestConfig::builder()
        .output_dir("out")
        .launch_timeout_secs(90)
        .navigation_timeout_secs(20)
        .content_timeout_secs(8)
        .poll_interval_secs(0)
        .max_poll_attempts(2)
        .max_concurrent_pages(16)
        .min_image_height(300)
        .image_timeout_secs(12)
        .max_image_bytes(1024)
        .thumbnail_size(96)
        .chrome_data_dir(Some(PathBuf::from("/tmp/profiles")))
        .build()
        .unwrap();

    assert_eq!(config.launch_timeout(), Duration::from_secs(90));
    assert_eq!(config.navigation_timeout_secs(), 20);
    assert_eq!(config.content_timeout_secs(), 8);
    assert_eq!(config.poll_interval(), Duration::ZERO);
    assert_eq!(config.max_poll_attempts(), 2);
    assert_eq!(config.max_concurrent_pages(), Some(16));
    assert_eq!(config.min_image_height(), 300);
    assert_eq!(config.image_timeout(), Duration::from_secs(12));
    assert_eq!(config.max_image_bytes(), 1024);
    assert_eq!(config.thumbnail_size(), 96);
    assert_eq!(config.chrome_data_dir(), Some(&PathBuf::from("/tmp/profiles")));
}

#[test]
fn test_optional_fields_can_be_set_before_output_dir() {
    let config = HarvestConfig::builder()
        .max_poll_attempts(3)
        .output_dir("out")
        .build()
        .unwrap();

    assert_eq!(config.max_poll_attempts(), 3);
}

#[test]
fn test_unbounded_concurrency() {
    let config = HarvestConfig::builder()
        .output_dir("out")
        .unbounded()
        .build()
        .unwrap();

    assert_eq!(config.max_concurrent_pages(), None);
}

#[test]
fn test_invalid_values_are_rejected() {
    let zero_limit = HarvestConfig::builder()
        .output_dir("out")
        .max_concurrent_pages(0)
        .build();
    assert!(zero_limit.is_err());

    let zero_polls = HarvestConfig::builder()
        .output_dir("out")
        .max_poll_attempts(0)
        .build();
    assert!(zero_polls.is_err());

    let zero_timeout = HarvestConfig::builder()
        .output_dir("out")
        .content_timeout_secs(0)
        .build();
    assert!(zero_timeout.is_err());
}

#[test]
fn test_config_serializes_without_profile_dir() {
    let config = HarvestConfig::builder()
        .output_dir("out")
        .chrome_data_dir(Some(PathBuf::from("/tmp/profiles")))
        .build()
        .unwrap();

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["max_poll_attempts"], 6);
    assert!(json.get("chrome_data_dir").is_none());
}
