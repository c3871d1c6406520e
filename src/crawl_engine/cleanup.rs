//! Browser shutdown after a run
//!
//! Runs once every session of the run is closed.

use chromiumoxide::Browser;
use log::{debug, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How long to wait for the CDP handler to drain after the browser exits
const HANDLER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of cleanup operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// All cleanup operations succeeded
    Success,
    /// Some cleanup operations failed, with error details
    PartialFailure(Vec<String>),
}

/// Close the browser, wait for its process and handler task, and remove
/// the profile directory when the run created it.
///
/// Failures are collected rather than returned; the harvested data is
/// already in memory at this point.
pub async fn shutdown_browser(
    mut browser: Browser,
    handler_task: JoinHandle<()>,
    chrome_data_dir: PathBuf,
    remove_data_dir: bool,
) -> CleanupResult {
    let mut errors = Vec::new();

    debug!("Closing browser");
    if let Err(e) = browser.close().await {
        warn!("Failed to close browser: {e}");
        errors.push(format!("Browser close failed: {e}"));
    }

    // Reap the process so it does not outlive the run
    if let Err(e) = browser.wait().await {
        warn!("Failed to wait for browser exit: {e}");
        errors.push(format!("Browser wait failed: {e}"));
    }
    drop(browser);

    match tokio::time::timeout(HANDLER_DRAIN_TIMEOUT, handler_task).await {
        Ok(Ok(())) => debug!("Browser handler finished"),
        Ok(Err(e)) => errors.push(format!("Browser handler failed: {e}")),
        Err(_) => errors.push("Browser handler did not finish in time".to_string()),
    }

    if remove_data_dir {
        debug!("Removing Chrome data directory {}", chrome_data_dir.display());
        if let Err(e) = std::fs::remove_dir_all(&chrome_data_dir) {
            warn!("Failed to clean up Chrome data directory: {e}");
            errors.push(format!("Directory cleanup failed: {e}"));
        }
    }

    if errors.is_empty() {
        CleanupResult::Success
    } else {
        CleanupResult::PartialFailure(errors)
    }
}
