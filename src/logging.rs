//! Log configuration for harvest runs.
//!
//! The library only emits through `log`/`tracing` macros; the binary turns
//! a [`LogSettings`] into a `tracing-subscriber` registry. `RUST_LOG`, when
//! set, replaces the directives built here.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Target the browser driver logs under
const DRIVER_TARGET: &str = "chromiumoxide";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Level for this crate and everything not listed elsewhere
    pub level: String,
    /// Level for the browser driver, which is noisy at debug
    pub driver_level: String,
    /// Emit one JSON object per line instead of human-readable text
    pub json: bool,
    /// Log each task's duration at info level
    pub task_timings: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            driver_level: "warn".to_string(),
            json: false,
            task_timings: false,
        }
    }
}

impl LogSettings {
    /// Filter directives, e.g. `info,chromiumoxide=warn`
    #[must_use]
    pub fn directives(&self) -> String {
        format!("{},{DRIVER_TARGET}={}", self.level, self.driver_level)
    }

    /// `RUST_LOG` when present, otherwise these settings
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directives()))
    }

    /// Install the global subscriber. Fails if one is already installed.
    pub fn try_init(&self) -> anyhow::Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        if self.json {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_target(true))
                .try_init()?;
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_target(true))
                .try_init()?;
        }
        Ok(())
    }
}
