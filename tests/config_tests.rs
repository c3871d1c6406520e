//! Tests for the type-safe configuration builder pattern

use listing_harvest::utils::{
    DEFAULT_DETAIL_FANOUT_LIMIT, DEFAULT_RENDER_SETTLE_SECS, DEFAULT_TASK_TIMEOUT_SECS,
};
use listing_harvest::{HarvestConfig, SiteProfile};
use std::path::Path;
use std::time::Duration;

#[test]
fn test_builder_requires_seeds_and_output_path() {
    // Does not compile without both required fields:
    // let config = HarvestConfig::builder().build();
    // let config = HarvestConfig::builder().seed_urls(["https://a.test"]).build();
    let config = HarvestConfig::builder()
        .seed_urls(["https://www.spoonflower.com/en/shop?on=fabric"])
        .output_path("out/links.json")
        .build()
        .expect("valid config");

    assert_eq!(config.seed_urls(), ["https://www.spoonflower.com/en/shop?on=fabric"]);
    assert_eq!(config.output_path(), Path::new("out/links.json"));
}

#[test]
fn test_builder_optional_fields_have_defaults() {
    let config = HarvestConfig::builder()
        .seed_urls(["https://www.spoonflower.com/en/shop"])
        .output_path("links.json")
        .build()
        .expect("valid config");

    assert_eq!(config.page_count(), 1);
    assert_eq!(config.task_timeout(), Duration::from_secs(DEFAULT_TASK_TIMEOUT_SECS));
    assert_eq!(config.render_settle(), Duration::from_secs(DEFAULT_RENDER_SETTLE_SECS));
    assert_eq!(config.detail_fanout_limit(), DEFAULT_DETAIL_FANOUT_LIMIT);
    assert_eq!(config.max_concurrent_tasks(), None);
    assert!(config.headless());
    assert_eq!(config.profile(), SiteProfile::Catalog);
    assert_eq!(config.link_prefix(), "/en/fabric");
}

#[test]
fn test_base_url_defaults_to_first_seed_origin() {
    let config = HarvestConfig::builder()
        .profile(SiteProfile::Property)
        .seed_urls(["https://www.crexi.com/properties?types=Retail", "https://other.test/x"])
        .output_path("properties.json")
        .build()
        .expect("valid config");

    assert_eq!(config.base_url(), Some("https://www.crexi.com"));
}

#[test]
fn test_explicit_base_url_is_kept() {
    let config = HarvestConfig::builder()
        .base_url(Some("https://mirror.test".to_string()))
        .seed_urls(["https://www.crexi.com/properties"])
        .output_path("properties.json")
        .build()
        .expect("valid config");

    assert_eq!(config.base_url(), Some("https://mirror.test"));
}

#[test]
fn test_invalid_values_are_rejected() {
    let build = |pages: usize, timeout: u64, max: Option<usize>| {
        HarvestConfig::builder()
            .page_count(pages)
            .task_timeout_secs(timeout)
            .max_concurrent_tasks(max)
            .seed_urls(["https://a.test/list"])
            .output_path("links.json")
            .build()
    };

    assert!(build(1, 60, None).is_ok());
    assert!(build(0, 60, None).is_err());
    assert!(build(1, 0, None).is_err());
    assert!(build(1, 60, Some(0)).is_err());
}

#[test]
fn test_seed_urls_must_be_absolute() {
    let empty: [&str; 0] = [];
    assert!(
        HarvestConfig::builder()
            .seed_urls(empty)
            .output_path("links.json")
            .build()
            .is_err()
    );
    assert!(
        HarvestConfig::builder()
            .seed_urls(["/en/shop"])
            .output_path("links.json")
            .build()
            .is_err()
    );
}

#[test]
fn test_config_round_trips_through_json() {
    let config = HarvestConfig::builder()
        .page_count(3)
        .seed_urls(["https://a.test/list"])
        .output_path("links.json")
        .build()
        .expect("valid config");

    let json = serde_json::to_string(&config).expect("serialize");
    let back: HarvestConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.page_count(), 3);
    assert_eq!(back.seed_urls(), config.seed_urls());
}
