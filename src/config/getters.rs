//! Getter methods for `HarvestConfig`

use std::path::Path;
use std::time::Duration;

use super::types::HarvestConfig;
use crate::page_extractor::{SelectorRules, SiteProfile};

impl HarvestConfig {
    #[must_use]
    pub fn seed_urls(&self) -> &[String] {
        &self.seed_urls
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    #[must_use]
    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }

    #[must_use]
    pub fn render_settle(&self) -> Duration {
        Duration::from_secs(self.render_settle_secs)
    }

    #[must_use]
    pub fn detail_fanout_limit(&self) -> usize {
        self.detail_fanout_limit
    }

    #[must_use]
    pub fn max_concurrent_tasks(&self) -> Option<usize> {
        self.max_concurrent_tasks
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn profile(&self) -> SiteProfile {
        self.profile
    }

    #[must_use]
    pub fn link_prefix(&self) -> &str {
        &self.link_prefix
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    #[must_use]
    pub fn selectors(&self) -> &SelectorRules {
        &self.selectors
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&Path> {
        self.chrome_data_dir.as_deref()
    }
}
