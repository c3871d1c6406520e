//! Type-safe builder for `HarvestConfig` using the typestate pattern
//!
//! Seed URLs and the output path must be set before `build()` is available.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::HarvestConfig;
use crate::page_extractor::{SelectorRules, SiteProfile};
use crate::utils::is_valid_url;

// Type states for the builder
pub struct WithSeedUrls;
pub struct WithOutputPath;

pub struct HarvestConfigBuilder<State = ()> {
    pub(crate) config: HarvestConfig,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for HarvestConfigBuilder<()> {
    fn default() -> Self {
        Self {
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

impl<State> HarvestConfigBuilder<State> {
    fn into_state<Next>(self) -> HarvestConfigBuilder<Next> {
        HarvestConfigBuilder {
            config: self.config,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn page_count(mut self, pages: usize) -> Self {
        self.config.page_count = pages;
        self
    }

    #[must_use]
    pub fn task_timeout_secs(mut self, secs: u64) -> Self {
        self.config.task_timeout_secs = secs;
        self
    }

    /// Fixed delay between navigation and reading the rendered page
    #[must_use]
    pub fn render_settle_secs(mut self, secs: u64) -> Self {
        self.config.render_settle_secs = secs;
        self
    }

    #[must_use]
    pub fn detail_fanout_limit(mut self, limit: usize) -> Self {
        self.config.detail_fanout_limit = limit;
        self
    }

    #[must_use]
    pub fn max_concurrent_tasks(mut self, limit: Option<usize>) -> Self {
        self.config.max_concurrent_tasks = limit;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn profile(mut self, profile: SiteProfile) -> Self {
        self.config.profile = profile;
        self
    }

    #[must_use]
    pub fn link_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.link_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn base_url(mut self, base_url: Option<String>) -> Self {
        self.config.base_url = base_url;
        self
    }

    #[must_use]
    pub fn selectors(mut self, selectors: SelectorRules) -> Self {
        self.config.selectors = selectors;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.chrome_data_dir = dir;
        self
    }
}

impl HarvestConfigBuilder<()> {
    pub fn seed_urls<I, S>(mut self, urls: I) -> HarvestConfigBuilder<WithSeedUrls>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.seed_urls = urls.into_iter().map(|u| u.into().trim().to_string()).collect();
        self.into_state()
    }
}

impl HarvestConfigBuilder<WithSeedUrls> {
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> HarvestConfigBuilder<WithOutputPath> {
        self.config.output_path = path.into();
        self.into_state()
    }
}

// Build method only available when all required fields are set
impl HarvestConfigBuilder<WithOutputPath> {
    pub fn build(self) -> Result<HarvestConfig> {
        let mut config = self.config;

        if config.seed_urls.is_empty() {
            return Err(anyhow!("at least one seed URL is required"));
        }
        if let Some(bad) = config.seed_urls.iter().find(|u| !is_valid_url(u)) {
            return Err(anyhow!("seed URL is not an absolute http(s) URL: '{bad}'"));
        }
        if config.page_count == 0 {
            return Err(anyhow!("page_count must be at least 1"));
        }
        if config.task_timeout_secs == 0 {
            return Err(anyhow!("task_timeout_secs must be greater than 0"));
        }
        if config.max_concurrent_tasks == Some(0) {
            return Err(anyhow!("max_concurrent_tasks must be at least 1 when set"));
        }
        if config.output_path.as_os_str().is_empty() {
            return Err(anyhow!("output_path must not be empty"));
        }

        if config.base_url.is_none() {
            config.base_url = url::Url::parse(&config.seed_urls[0])
                .ok()
                .map(|u| u.origin().ascii_serialization());
        }

        Ok(config)
    }
}
