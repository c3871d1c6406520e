//! Progress reporting abstraction for harvest runs
//!
//! Defines the `ProgressReporter` trait for lifecycle event reporting
//! and provides a no-op implementation for simple use cases.

use std::time::Duration;

use super::crawl_types::{ContextTag, TaskResult};

/// Trait for reporting progress at key lifecycle events
///
/// Implementations can send updates to channels, log to console, update UI, etc.
pub trait ProgressReporter: Send + Sync {
    /// Report that a batch of `count` tasks is starting
    fn report_batch_started(&self, context: ContextTag, count: usize);

    /// Report that a task has been handed to the session runner
    fn report_task_started(&self, context: ContextTag, index: usize, url: &str);

    /// Report a finished task (completed, timed out or failed)
    fn report_task_finished(&self, result: &TaskResult);

    /// Report that every task of a batch has finished
    fn report_batch_completed(&self, context: ContextTag, elapsed: Duration);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_batch_started(&self, _context: ContextTag, _count: usize) {}

    #[inline(always)]
    fn report_task_started(&self, _context: ContextTag, _index: usize, _url: &str) {}

    #[inline(always)]
    fn report_task_finished(&self, _result: &TaskResult) {}

    #[inline(always)]
    fn report_batch_completed(&self, _context: ContextTag, _elapsed: Duration) {}
}
