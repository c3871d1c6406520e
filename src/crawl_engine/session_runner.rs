//! Single fetch task processing
//!
//! Handles the complete lifecycle of one task:
//! - Session acquisition
//! - Navigation under the task timeout
//! - Fixed render settle delay
//! - Rendered content retrieval and record extraction
//! - Session release on every exit path

use log::{debug, trace, warn};
use std::time::Duration;
use tokio::time::Instant;

use super::crawl_types::{FetchTask, SessionState, TaskOutcome, TaskResult};
use super::page_timeout::with_page_timeout;
use super::session::{BrowserSession, SessionFactory};
use crate::errors::{HarvestError, HarvestResult};
use crate::page_extractor::{Extracted, PageRecords, RecordExtractor};

/// Tracks the state machine of one session and logs its transitions
#[derive(Debug)]
pub struct SessionLifecycle<'a> {
    url: &'a str,
    state: SessionState,
}

impl<'a> SessionLifecycle<'a> {
    #[must_use]
    pub fn new(url: &'a str) -> Self {
        Self {
            url,
            state: SessionState::Idle,
        }
    }

    pub fn advance(&mut self, next: SessionState) {
        if self.state.can_transition_to(next) {
            trace!("{}: {:?} -> {:?}", self.url, self.state, next);
        } else {
            warn!("{}: unexpected session transition {:?} -> {:?}", self.url, self.state, next);
        }
        self.state = next;
    }
}

/// Navigate, settle, read and extract. Leaves closing to the caller.
async fn drive_session<S: BrowserSession>(
    session: &mut S,
    lifecycle: &mut SessionLifecycle<'_>,
    task: &FetchTask,
    extractor: &RecordExtractor,
    render_settle: Duration,
) -> HarvestResult<Extracted<PageRecords>> {
    lifecycle.advance(SessionState::Navigating);
    match with_page_timeout(session.navigate(&task.url), task.timeout, "navigation").await {
        Ok(()) => {}
        Err(HarvestError::OperationTimeout { timeout, .. }) => {
            lifecycle.advance(SessionState::TimedOut);
            return Err(HarvestError::NavigationTimeout {
                url: task.url.clone(),
                timeout,
            });
        }
        Err(e) => {
            lifecycle.advance(SessionState::Failed);
            return Err(e);
        }
    }

    lifecycle.advance(SessionState::Rendering);
    tokio::time::sleep(render_settle).await;

    let content =
        match with_page_timeout(session.rendered_content(), task.timeout, "content retrieval").await {
            Ok(content) => content,
            Err(e) => {
                lifecycle.advance(SessionState::Failed);
                return Err(e);
            }
        };

    let extracted = extractor.extract(task.context, &task.url, &content);
    lifecycle.advance(SessionState::Extracted);
    Ok(extracted)
}

/// Run one fetch task to completion.
///
/// Never returns an error: timeouts and failures become an empty
/// [`TaskResult`] so sibling tasks are unaffected. The session is closed
/// before this function returns, whatever the outcome.
pub async fn run_fetch_task<F: SessionFactory>(
    factory: &F,
    extractor: &RecordExtractor,
    task: FetchTask,
    render_settle: Duration,
) -> TaskResult {
    let started = Instant::now();
    let mut lifecycle = SessionLifecycle::new(&task.url);

    let mut session = match factory.open().await {
        Ok(session) => session,
        Err(e) => {
            warn!("[{}] could not open session for {}: {e}", task.index, task.url);
            lifecycle.advance(SessionState::Failed);
            lifecycle.advance(SessionState::Closed);
            return TaskResult::empty(&task, TaskOutcome::Failed(e.to_string()), started.elapsed());
        }
    };

    let outcome = drive_session(&mut session, &mut lifecycle, &task, extractor, render_settle).await;

    if let Err(e) = session.close().await {
        debug!("[{}] session close failed for {}: {e}", task.index, task.url);
    }
    lifecycle.advance(SessionState::Closed);

    let duration = started.elapsed();
    match outcome {
        Ok(extracted) => TaskResult {
            index: task.index,
            url: task.url.clone(),
            context: task.context,
            outcome: TaskOutcome::Completed,
            source_key: task.source_key.clone(),
            records: extracted.records,
            gaps: extracted.gaps.len(),
            duration,
            elapsed_since_start: task.batch_start.map(|start| start.elapsed()),
        },
        Err(e @ HarvestError::NavigationTimeout { .. }) => {
            warn!("[{}] {e}", task.index);
            TaskResult::empty(&task, TaskOutcome::TimedOut, duration)
        }
        Err(e) => {
            warn!("[{}] task for {} failed: {e}", task.index, task.url);
            TaskResult::empty(&task, TaskOutcome::Failed(e.to_string()), duration)
        }
    }
}
