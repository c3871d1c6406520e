//! Crawl Engine Module
//!
//! Task execution for harvest runs: one browser session per fetch task,
//! index-ordered batches with a fixed two-level fan-out, and the end-to-end
//! run that feeds the result store.

// Sub-modules
pub mod cleanup;
pub mod crawl_types;
pub mod execution;
pub mod orchestrator;
pub mod page_timeout;
pub mod pagination;
pub mod progress;
pub mod session;
pub mod session_runner;

// Re-exports for public API
pub use execution::{HarvestReport, TableCounts, persist_batch, run_harvest, run_harvest_with_progress};

// Re-export orchestration and progress types for advanced usage
pub use orchestrator::Orchestrator;
pub use pagination::{expand_seeds, generate_pages};
pub use progress::{NoOpProgress, ProgressReporter};

// Re-export session boundary
pub use session::{BrowserSession, ChromiumSession, ChromiumSessionFactory, SessionFactory};
pub use session_runner::{SessionLifecycle, run_fetch_task};

// Re-export crawl types
pub use crawl_types::{
    ContextTag, DetailTarget, FetchTask, PrimaryBatch, PrimaryItem, SecondaryBatch, SessionState, TaskOutcome,
    TaskResult, TaskSettings,
};

pub use page_timeout::with_page_timeout;
