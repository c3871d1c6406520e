//! Batch orchestration
//!
//! Runs one level of fetch tasks at a time:
//! - every task of a level is started together on the current task
//! - results are slotted back by input index, whatever the completion order
//! - a completed listing page fans out into one secondary level of detail pages
//! - an optional semaphore bounds the number of live sessions

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use log::{debug, info};
use std::future::Future;
use tokio::sync::Semaphore;
use tokio::time::Instant;

use super::crawl_types::{
    ContextTag, DetailTarget, FetchTask, PrimaryBatch, PrimaryItem, SecondaryBatch, TaskResult,
    TaskSettings,
};
use super::progress::{NoOpProgress, ProgressReporter};
use super::session::SessionFactory;
use super::session_runner::run_fetch_task;
use crate::logging::LogSettings;
use crate::page_extractor::RecordExtractor;

/// Drive futures concurrently and return their outputs in index order.
///
/// Each future yields its own slot index alongside its output.
async fn gather_indexed<T, Fut>(count: usize, futures: impl IntoIterator<Item = Fut>) -> Vec<T>
where
    Fut: Future<Output = (usize, T)>,
{
    let mut slots: Vec<Option<T>> = (0..count).map(|_| None).collect();
    let mut pending: FuturesUnordered<Fut> = futures.into_iter().collect();

    while let Some((index, output)) = pending.next().await {
        if let Some(slot) = slots.get_mut(index) {
            *slot = Some(output);
        }
    }

    slots.into_iter().flatten().collect()
}

/// Runs primary and secondary batches against one session factory
pub struct Orchestrator<F: SessionFactory, P: ProgressReporter = NoOpProgress> {
    factory: F,
    extractor: RecordExtractor,
    settings: TaskSettings,
    progress: P,
    log_settings: LogSettings,
    permits: Option<Semaphore>,
}

impl<F: SessionFactory> Orchestrator<F, NoOpProgress> {
    /// Orchestrator with default log settings and no progress reporting
    #[must_use]
    pub fn new(factory: F, extractor: RecordExtractor, settings: TaskSettings) -> Self {
        Self::with_progress(factory, extractor, settings, &LogSettings::default(), NoOpProgress)
    }
}

impl<F: SessionFactory, P: ProgressReporter> Orchestrator<F, P> {
    #[must_use]
    pub fn with_progress(
        factory: F,
        extractor: RecordExtractor,
        settings: TaskSettings,
        log_settings: &LogSettings,
        progress: P,
    ) -> Self {
        let permits = settings.max_concurrent_tasks.map(Semaphore::new);
        Self {
            factory,
            extractor,
            settings,
            progress,
            log_settings: log_settings.clone(),
            permits,
        }
    }

    #[must_use]
    pub fn log_settings(&self) -> &LogSettings {
        &self.log_settings
    }

    #[must_use]
    pub fn extractor(&self) -> &RecordExtractor {
        &self.extractor
    }

    /// Hand back the factory, e.g. to shut its browser down
    #[must_use]
    pub fn into_factory(self) -> F {
        self.factory
    }

    /// Run one listing task per URL, each followed by its detail pages.
    ///
    /// The returned batch has exactly one item per input URL, in input order.
    pub async fn run_primary(&self, urls: &[String]) -> PrimaryBatch {
        let start = Instant::now();
        self.progress.report_batch_started(ContextTag::Listing, urls.len());
        info!("Starting primary batch of {} page(s)", urls.len());

        let items = gather_indexed(
            urls.len(),
            urls.iter().enumerate().map(|(index, url)| async move {
                let task = self.fetch_task(url, None, index, ContextTag::Listing, start);
                (index, self.run_primary_item(task, start).await)
            }),
        )
        .await;

        let elapsed = start.elapsed();
        self.progress.report_batch_completed(ContextTag::Listing, elapsed);
        info!("Primary batch finished in {elapsed:.2?}");
        PrimaryBatch { items }
    }

    /// Run one detail task per target. Results never fan out further.
    pub async fn run_secondary(&self, targets: &[DetailTarget], start: Instant) -> SecondaryBatch {
        let level_start = Instant::now();
        self.progress
            .report_batch_started(ContextTag::DetailSecondary, targets.len());
        debug!("Starting secondary batch of {} page(s)", targets.len());

        let results = gather_indexed(
            targets.len(),
            targets.iter().enumerate().map(|(index, target)| async move {
                let task = self.fetch_task(
                    &target.url,
                    target.source_key.clone(),
                    index,
                    ContextTag::DetailSecondary,
                    start,
                );
                (index, self.run_task(task).await)
            }),
        )
        .await;

        self.progress
            .report_batch_completed(ContextTag::DetailSecondary, level_start.elapsed());
        SecondaryBatch { results }
    }

    fn fetch_task(
        &self,
        url: &str,
        source_key: Option<String>,
        index: usize,
        context: ContextTag,
        start: Instant,
    ) -> FetchTask {
        FetchTask {
            url: url.to_string(),
            index,
            context,
            timeout: self.settings.task_timeout,
            batch_start: Some(start),
            source_key,
        }
    }

    /// Listing task first; its permit is released before the detail pages
    /// queue for their own.
    async fn run_primary_item(&self, task: FetchTask, start: Instant) -> PrimaryItem {
        let result = self.run_task(task).await;

        let limit = self.settings.detail_fanout_limit;
        if !result.outcome.is_completed() || limit == 0 {
            return PrimaryItem {
                task: result,
                secondary: None,
            };
        }

        let targets = self.extractor.detail_targets(&result.url, &result.records, limit);
        if targets.is_empty() {
            return PrimaryItem {
                task: result,
                secondary: None,
            };
        }

        debug!(
            "[{}] {} fans out to {} detail page(s)",
            result.index,
            result.url,
            targets.len()
        );
        let secondary = self.run_secondary(&targets, start).await;
        PrimaryItem {
            task: result,
            secondary: Some(secondary),
        }
    }

    async fn run_task(&self, task: FetchTask) -> TaskResult {
        // Held until the session is closed
        let _permit = match &self.permits {
            Some(permits) => permits.acquire().await.ok(),
            None => None,
        };

        self.progress
            .report_task_started(task.context, task.index, &task.url);
        let result = run_fetch_task(&self.factory, &self.extractor, task, self.settings.render_settle).await;
        self.progress.report_task_finished(&result);

        if self.log_settings.task_timings {
            match result.elapsed_since_start {
                Some(since_start) => info!(
                    "[{} {}] {} took {:.2?} ({:.2?} since start)",
                    result.context, result.index, result.url, result.duration, since_start
                ),
                None => info!(
                    "[{} {}] {} took {:.2?}",
                    result.context, result.index, result.url, result.duration
                ),
            }
        }

        result
    }
}
