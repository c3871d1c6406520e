//! Core types for harvest tasks and batches.
//!
//! A primary batch holds one item per listing URL; each item may embed one
//! secondary batch of detail pages. Secondary results have no further
//! nesting, so the fan-out depth is a property of these types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

use crate::config::HarvestConfig;
use crate::page_extractor::PageRecords;

/// Which extraction ruleset a fetch task applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextTag {
    Listing,
    DetailSecondary,
}

impl fmt::Display for ContextTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing => write!(f, "listing"),
            Self::DetailSecondary => write!(f, "detail-secondary"),
        }
    }
}

/// Transient unit of work handed to the session runner
#[derive(Debug, Clone)]
pub struct FetchTask {
    pub url: String,
    pub index: usize,
    pub context: ContextTag,
    pub timeout: Duration,
    /// Start of the enclosing run; only used for elapsed-time diagnostics
    pub batch_start: Option<Instant>,
    /// Key of the link row this detail page was discovered from
    pub source_key: Option<String>,
}

/// A detail page to visit, with the key of the link row it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTarget {
    pub url: String,
    pub source_key: Option<String>,
}

/// Lifecycle of one browser session.
///
/// `Idle → Navigating → Rendering → Extracted → Closed`, with
/// `Navigating → TimedOut → Closed` and `any → Failed → Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Navigating,
    Rendering,
    Extracted,
    TimedOut,
    Failed,
    Closed,
}

impl SessionState {
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use SessionState::{Closed, Extracted, Failed, Idle, Navigating, Rendering, TimedOut};
        match (self, next) {
            (Idle, Navigating)
            | (Navigating, Rendering | TimedOut)
            | (Rendering, Extracted)
            | (Extracted | TimedOut | Failed, Closed) => true,
            (Closed | Failed, Failed) => false,
            (_, Failed) => true,
            _ => false,
        }
    }
}

/// How a task ended. Every non-completed task carries empty records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum TaskOutcome {
    Completed,
    TimedOut,
    Failed(String),
}

impl TaskOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Result of one fetch task, in the slot of its input index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub index: usize,
    pub url: String,
    pub context: ContextTag,
    pub outcome: TaskOutcome,
    /// Link row key of a detail page; `None` for listing pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,
    pub records: PageRecords,
    /// Number of items skipped or partially extracted on the page
    pub gaps: usize,
    /// Wall-clock time the task itself took
    pub duration: Duration,
    /// Time from the run's start to this task's completion
    pub elapsed_since_start: Option<Duration>,
}

impl TaskResult {
    /// Empty result for a task that did not complete
    #[must_use]
    pub fn empty(task: &FetchTask, outcome: TaskOutcome, duration: Duration) -> Self {
        Self {
            index: task.index,
            url: task.url.clone(),
            context: task.context,
            outcome,
            source_key: task.source_key.clone(),
            records: PageRecords::default(),
            gaps: 0,
            duration,
            elapsed_since_start: task.batch_start.map(|start| start.elapsed()),
        }
    }
}

/// Detail-page results discovered on one listing page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecondaryBatch {
    pub results: Vec<TaskResult>,
}

/// One listing page and its detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryItem {
    pub task: TaskResult,
    pub secondary: Option<SecondaryBatch>,
}

/// Results of a run in seed order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimaryBatch {
    pub items: Vec<PrimaryItem>,
}

impl PrimaryBatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every task result, listing pages first within each item
    pub fn task_results(&self) -> impl Iterator<Item = &TaskResult> {
        self.items.iter().flat_map(|item| {
            std::iter::once(&item.task).chain(
                item.secondary
                    .iter()
                    .flat_map(|batch| batch.results.iter()),
            )
        })
    }

    /// Result counts as (completed, timed out, failed)
    #[must_use]
    pub fn outcome_counts(&self) -> (usize, usize, usize) {
        self.task_results()
            .fold((0, 0, 0), |(done, timed_out, failed), result| match result.outcome {
                TaskOutcome::Completed => (done + 1, timed_out, failed),
                TaskOutcome::TimedOut => (done, timed_out + 1, failed),
                TaskOutcome::Failed(_) => (done, timed_out, failed + 1),
            })
    }
}

/// Timing and fan-out knobs for a batch
#[derive(Debug, Clone)]
pub struct TaskSettings {
    pub task_timeout: Duration,
    pub render_settle: Duration,
    pub detail_fanout_limit: usize,
    pub max_concurrent_tasks: Option<usize>,
}

impl TaskSettings {
    #[must_use]
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self {
            task_timeout: config.task_timeout(),
            render_settle: config.render_settle(),
            detail_fanout_limit: config.detail_fanout_limit(),
            max_concurrent_tasks: config.max_concurrent_tasks(),
        }
    }
}
