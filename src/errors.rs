//! Error types for harvest operations
//!
//! Task-level problems (navigation timeouts, extraction gaps) are recovered
//! where they happen and only surface in results and logs. Store and launch
//! errors are fatal for the run.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for harvest operations
pub type HarvestResult<T> = Result<T, HarvestError>;

/// Error types for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    /// A single task's navigation exceeded its timeout
    #[error("Navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },

    /// A page operation other than navigation exceeded its timeout
    #[error("{operation} timed out after {timeout:?}")]
    OperationTimeout { operation: String, timeout: Duration },

    /// Browser launch, page creation or CDP failure
    #[error("Browser error: {0}")]
    Browser(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Result table could not be loaded or persisted
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by the result store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted table exists but could not be read or parsed.
    ///
    /// The merge must stop here; writing an empty table would destroy the
    /// previous snapshot.
    #[error("Result table at {path} is corrupt: {reason}")]
    StoreCorruption { path: PathBuf, reason: String },

    /// The merged table could not be written
    #[error("Failed to persist result table to {path}: {reason}")]
    PersistFailed { path: PathBuf, reason: String },
}

/// An expected structural region was absent on one item of a page.
///
/// Recovered locally: the item is skipped or the field becomes `null`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("item {item}: missing {region}")]
pub struct ExtractionGap {
    /// Position of the item on the page (0 for single-record pages)
    pub item: usize,
    /// Selector or region name that was not found
    pub region: String,
}

impl ExtractionGap {
    pub fn new(item: usize, region: impl Into<String>) -> Self {
        Self {
            item,
            region: region.into(),
        }
    }
}
