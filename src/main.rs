// listing-harvest: render paginated listing pages, follow their detail
// pages, and merge the records into JSON tables.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use listing_harvest::crawl_engine::run_harvest;
use listing_harvest::utils::{
    DEFAULT_DETAIL_FANOUT_LIMIT, DEFAULT_LINK_PREFIX, DEFAULT_PAGE_COUNT, DEFAULT_RENDER_SETTLE_SECS,
    DEFAULT_TASK_TIMEOUT_SECS,
};
use listing_harvest::{HarvestConfig, LogSettings, SiteProfile};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Listing URL to start from; repeat for several seeds
    #[arg(short, long = "seed", required = true)]
    seeds: Vec<String>,

    /// Listing pages to visit per seed
    #[arg(short, long, default_value_t = DEFAULT_PAGE_COUNT)]
    pages: usize,

    /// Per-task navigation timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TASK_TIMEOUT_SECS)]
    timeout: u64,

    /// Seconds to wait after navigation before reading the page
    #[arg(long, default_value_t = DEFAULT_RENDER_SETTLE_SECS)]
    settle: u64,

    /// Primary table; the detail table is written next to it
    #[arg(short, long, default_value = "links.json")]
    output: PathBuf,

    /// Extraction rules to apply (catalog or property)
    #[arg(long, default_value_t = SiteProfile::Catalog)]
    profile: SiteProfile,

    /// Detail pages to follow per listing page; 0 disables fan-out
    #[arg(long, default_value_t = DEFAULT_DETAIL_FANOUT_LIMIT)]
    fanout: usize,

    /// Upper bound on open browser sessions
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Path prefix of catalog detail links
    #[arg(long, default_value = DEFAULT_LINK_PREFIX)]
    link_prefix: String,

    /// Origin used to absolutize property links (defaults to the first seed's)
    #[arg(long)]
    base_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Log level for this tool
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log level for the browser driver
    #[arg(long, default_value = "warn")]
    driver_log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Log the duration of every task
    #[arg(long)]
    task_timings: bool,
}

impl Args {
    fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.log_level.clone(),
            driver_level: self.driver_log_level.clone(),
            json: self.json_logs,
            task_timings: self.task_timings,
        }
    }

    fn into_config(self) -> Result<HarvestConfig> {
        HarvestConfig::builder()
            .page_count(self.pages)
            .task_timeout_secs(self.timeout)
            .render_settle_secs(self.settle)
            .detail_fanout_limit(self.fanout)
            .max_concurrent_tasks(self.max_concurrent)
            .headless(!self.headed)
            .profile(self.profile)
            .link_prefix(self.link_prefix)
            .base_url(self.base_url)
            .seed_urls(self.seeds)
            .output_path(self.output)
            .build()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_settings = args.log_settings();
    log_settings.try_init()?;

    let start = Instant::now();
    let config = args.into_config().context("Invalid configuration")?;
    tracing::info!(
        seeds = config.seed_urls().len(),
        pages = config.page_count(),
        output = %config.output_path().display(),
        "Starting harvest"
    );

    let report = run_harvest(config, &log_settings)
        .await
        .context("Harvest failed")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    tracing::info!("Total time: {:.2?}", start.elapsed());
    Ok(())
}
