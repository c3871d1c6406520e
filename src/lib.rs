//! Paginated listing harvester.
//!
//! Renders listing pages in a headless browser, extracts typed records,
//! follows a bounded number of detail pages per listing, and merges the
//! results into deduplicated JSON tables.

pub mod browser_setup;
pub mod config;
pub mod crawl_engine;
pub mod errors;
pub mod logging;
pub mod page_extractor;
pub mod page_identity;
pub mod result_store;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::HarvestConfig;
pub use crawl_engine::{
    ContextTag, HarvestReport, Orchestrator, PrimaryBatch, SecondaryBatch, TaskOutcome, TaskResult,
    generate_pages,
};
pub use errors::{ExtractionGap, HarvestError, HarvestResult, StoreError};
pub use logging::LogSettings;
pub use page_extractor::schema::*;
pub use page_extractor::{RecordExtractor, SelectorRules, SiteProfile};
pub use page_identity::{PageIdentity, extract_page_identity};
pub use result_store::{ResultStore, StoreRow};

/// Run a harvest with default log settings
pub async fn harvest(config: HarvestConfig) -> HarvestResult<HarvestReport> {
    crawl_engine::run_harvest(config, &LogSettings::default()).await
}
