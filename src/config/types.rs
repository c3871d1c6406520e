//! Core configuration types for harvest runs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::page_extractor::{SelectorRules, SiteProfile};
use crate::utils::{
    DEFAULT_DETAIL_FANOUT_LIMIT, DEFAULT_LINK_PREFIX, DEFAULT_PAGE_COUNT,
    DEFAULT_RENDER_SETTLE_SECS, DEFAULT_TASK_TIMEOUT_SECS,
};

/// Main configuration struct for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Listing URLs; each one is expanded to `page_count` pages.
    ///
    /// **INVARIANT:** non-empty, every entry an absolute http(s) URL.
    pub(crate) seed_urls: Vec<String>,

    /// Pages generated per seed (`base`, `base?page=2`, ...). At least 1.
    pub(crate) page_count: usize,

    /// File the primary table is merged into
    pub(crate) output_path: PathBuf,

    /// Timeout in seconds for a task's navigation
    ///
    /// A task that exceeds it yields an empty result; siblings are unaffected.
    ///
    /// Default: 60 seconds
    pub(crate) task_timeout_secs: u64,

    /// Fixed delay in seconds between navigation and reading the rendered page
    ///
    /// Default: 10 seconds
    pub(crate) render_settle_secs: u64,

    /// Detail pages fetched per listing page (prefix of the discovered links)
    ///
    /// Set to 0 to skip the secondary batch entirely.
    ///
    /// Default: 10
    pub(crate) detail_fanout_limit: usize,

    /// Upper bound on in-flight tasks per batch; `None` runs every task at once
    pub(crate) max_concurrent_tasks: Option<usize>,

    pub(crate) headless: bool,

    /// Which extraction ruleset applies to listing and detail pages
    pub(crate) profile: SiteProfile,

    /// Only hyperlinks starting with this prefix become link records
    pub(crate) link_prefix: String,

    /// Base URL prepended to relative property links.
    /// Defaults to the origin of the first seed URL.
    pub(crate) base_url: Option<String>,

    #[serde(default)]
    pub(crate) selectors: SelectorRules,

    /// Chrome user data directory; a per-process temp dir when unset
    #[serde(skip)]
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            seed_urls: Vec::new(),
            page_count: DEFAULT_PAGE_COUNT,
            output_path: PathBuf::from("./links.json"),
            task_timeout_secs: DEFAULT_TASK_TIMEOUT_SECS,
            render_settle_secs: DEFAULT_RENDER_SETTLE_SECS,
            detail_fanout_limit: DEFAULT_DETAIL_FANOUT_LIMIT,
            max_concurrent_tasks: None,
            headless: true,
            profile: SiteProfile::Catalog,
            link_prefix: DEFAULT_LINK_PREFIX.to_string(),
            base_url: None,
            selectors: SelectorRules::default(),
            chrome_data_dir: None,
        }
    }
}
