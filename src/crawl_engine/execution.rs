//! End-to-end harvest runs
//!
//! Expands the seeds into listing pages, runs the primary batch on one
//! browser, shuts the browser down and then merges the results into the
//! primary and detail tables.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

use super::cleanup::{CleanupResult, shutdown_browser};
use super::crawl_types::{ContextTag, PrimaryBatch, TaskSettings};
use super::orchestrator::Orchestrator;
use super::pagination::expand_seeds;
use super::progress::{NoOpProgress, ProgressReporter};
use super::session::ChromiumSessionFactory;
use crate::browser_setup::launch_browser;
use crate::config::HarvestConfig;
use crate::errors::{HarvestError, HarvestResult, StoreError};
use crate::logging::LogSettings;
use crate::page_extractor::{PageRecords, SiteProfile};
use crate::result_store::{ResultStore, mark_scraped};
use crate::utils::details_table_path;

/// Row counts of the tables written by one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub primary_table: PathBuf,
    pub primary_rows: usize,
    pub detail_table: PathBuf,
    pub detail_rows: usize,
    /// Link rows whose detail page was fetched in this run
    pub newly_scraped: usize,
}

/// Outcome of a harvest run
#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    pub started_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub pages: usize,
    pub completed: usize,
    pub timed_out: usize,
    pub failed: usize,
    pub tables: TableCounts,
    #[serde(skip)]
    pub batch: PrimaryBatch,
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

/// Run a harvest with no progress reporting
pub async fn run_harvest(config: HarvestConfig, log_settings: &LogSettings) -> HarvestResult<HarvestReport> {
    run_harvest_with_progress(config, log_settings, NoOpProgress).await
}

pub async fn run_harvest_with_progress<P: ProgressReporter>(
    config: HarvestConfig,
    log_settings: &LogSettings,
    progress: P,
) -> HarvestResult<HarvestReport> {
    let started_at = Utc::now();
    let start = Instant::now();

    let extractor = crate::page_extractor::RecordExtractor::from_config(&config)?;
    let profile = extractor.profile();
    let urls = expand_seeds(config.seed_urls(), config.page_count());
    info!(
        "Harvesting {} listing page(s) from {} seed(s) with the {profile} profile",
        urls.len(),
        config.seed_urls().len()
    );

    let (browser, handler_task, data_dir) =
        launch_browser(config.headless(), config.chrome_data_dir().map(Path::to_path_buf))
            .await
            .map_err(|e| HarvestError::Browser(format!("{e:#}")))?;

    let orchestrator = Orchestrator::with_progress(
        ChromiumSessionFactory::new(browser),
        extractor,
        TaskSettings::from_config(&config),
        log_settings,
        progress,
    );

    let batch = orchestrator.run_primary(&urls).await;

    let browser = orchestrator.into_factory().into_browser();
    if let CleanupResult::PartialFailure(errors) =
        shutdown_browser(browser, handler_task, data_dir, config.chrome_data_dir().is_none()).await
    {
        warn!("Browser cleanup incomplete: {}", errors.join("; "));
    }

    let tables = persist_batch(&batch, profile, config.output_path())?;
    let (completed, timed_out, failed) = batch.outcome_counts();
    let elapsed = start.elapsed();
    info!(
        "Harvest finished in {elapsed:.2?}: {completed} completed, {timed_out} timed out, {failed} failed"
    );

    Ok(HarvestReport {
        started_at,
        elapsed,
        pages: urls.len(),
        completed,
        timed_out,
        failed,
        tables,
        batch,
    })
}

/// Every record of the batch, listing pages first within each item
fn collect_records(batch: &PrimaryBatch) -> PageRecords {
    let mut all = PageRecords::default();
    for result in batch.task_results() {
        let records = result.records.clone();
        all.links.extend(records.links);
        all.products.extend(records.products);
        all.properties.extend(records.properties);
        all.brokers.extend(records.brokers);
    }
    all
}

/// Link row keys of detail pages that completed
fn scraped_keys(batch: &PrimaryBatch) -> HashSet<String> {
    batch
        .task_results()
        .filter(|r| r.context == ContextTag::DetailSecondary && r.outcome.is_completed())
        .filter_map(|r| r.source_key.clone())
        .collect()
}

/// Merge a finished batch into the primary table at `output_path` and the
/// detail table next to it.
///
/// Catalog runs write links and products; property runs write properties
/// and brokers. A corrupt table aborts before either table is written.
pub fn persist_batch(
    batch: &PrimaryBatch,
    profile: SiteProfile,
    output_path: &Path,
) -> Result<TableCounts, StoreError> {
    let records = collect_records(batch);
    let detail_path = details_table_path(output_path);

    let counts = match profile {
        SiteProfile::Catalog => {
            let links = ResultStore::new(output_path);
            let products = ResultStore::new(&detail_path);

            let mut link_table = links.merged_with(records.links)?;
            let product_table = products.merged_with(records.products)?;
            let newly_scraped = mark_scraped(&mut link_table, &scraped_keys(batch));

            links.persist(&link_table)?;
            products.persist(&product_table)?;
            TableCounts {
                primary_table: output_path.to_path_buf(),
                primary_rows: link_table.len(),
                detail_table: detail_path,
                detail_rows: product_table.len(),
                newly_scraped,
            }
        }
        SiteProfile::Property => {
            let properties = ResultStore::new(output_path);
            let brokers = ResultStore::new(&detail_path);

            let property_table = properties.merged_with(records.properties)?;
            let broker_table = brokers.merged_with(records.brokers)?;

            properties.persist(&property_table)?;
            brokers.persist(&broker_table)?;
            TableCounts {
                primary_table: output_path.to_path_buf(),
                primary_rows: property_table.len(),
                detail_table: detail_path,
                detail_rows: broker_table.len(),
                newly_scraped: 0,
            }
        }
    };

    Ok(counts)
}
