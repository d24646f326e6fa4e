//! Bounded fan-out of lookup tasks behind a single barrier.
//!
//! Every task is spawned at once and waits for a pool permit before it runs.
//! Each task's outcome travels back through its own join handle, and the
//! handles are awaited in submission order, so the returned reports line up
//! with the registry regardless of completion order.

use crate::registry::TaskRegistry;
use crate::task::{LookupTask, TaskReport};
use futures::future::join_all;
use futures::FutureExt;
use sleuth_core::ScanningConfig;
use sleuth_lookups::LookupOutcome;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::Instrument;

/// Default number of lookups allowed to run at once.
pub const DEFAULT_WIDTH: usize = 16;

/// Runs every task of a registry and waits for all of them.
#[derive(Debug, Clone)]
pub struct FanOutScheduler {
    width: usize,
    task_timeout: Option<Duration>,
}

impl Default for FanOutScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

impl FanOutScheduler {
    /// Create a scheduler running at most `width` lookups at once.
    ///
    /// A width of zero is treated as one.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            task_timeout: None,
        }
    }

    /// Bound how long a single lookup may run once it has a permit.
    #[must_use]
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    /// Build from the `[scanning]` configuration section.
    #[must_use]
    pub fn from_config(config: &ScanningConfig) -> Self {
        let scheduler = Self::new(config.worker_pool_width);
        match config.task_timeout_secs {
            0 => scheduler,
            secs => scheduler.with_task_timeout(Duration::from_secs(secs)),
        }
    }

    /// Maximum number of lookups running at once.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Per-lookup timeout, if any.
    #[must_use]
    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout
    }

    /// Run every task and return one report per task, in registry order.
    ///
    /// Returns only after every task has reached a terminal state. A task
    /// that errors, panics or times out yields a failed outcome; it never
    /// cancels or delays the others.
    pub async fn run(&self, registry: &TaskRegistry) -> Vec<TaskReport> {
        if registry.len() > self.width {
            tracing::warn!(
                tasks = registry.len(),
                width = self.width,
                "more lookups than workers, some will queue"
            );
        }

        let permits = Arc::new(Semaphore::new(self.width));
        let started = Instant::now();

        let handles: Vec<_> = registry
            .tasks()
            .iter()
            .cloned()
            .map(|task| {
                let permits = Arc::clone(&permits);
                let timeout = self.task_timeout;
                let span = tracing::info_span!(
                    "lookup",
                    source = task.slot().source.id(),
                    input = task.slot().input.label(),
                );

                tokio::spawn(
                    async move {
                        // The semaphore is never closed, so a permit always arrives
                        let _permit = permits.acquire_owned().await.ok();
                        execute(task, timeout).await
                    }
                    .instrument(span),
                )
            })
            .collect();

        let joined = join_all(handles).await;

        let reports: Vec<TaskReport> = joined
            .into_iter()
            .zip(registry.tasks())
            .map(|(joined, task)| joined.unwrap_or_else(|e| abandoned(task, &e)))
            .collect();

        tracing::info!(
            tasks = reports.len(),
            failed = reports.iter().filter(|r| r.outcome.is_failed()).count(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "all lookups finished"
        );

        reports
    }
}

/// Run one lookup to a terminal outcome.
async fn execute(task: LookupTask, timeout: Option<Duration>) -> TaskReport {
    let started = Instant::now();
    let call = AssertUnwindSafe(task.lookup().lookup(task.query())).catch_unwind();

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(caught) => settle(caught),
            Err(_) => LookupOutcome::failed(format!("timed out after {limit:?}")),
        },
        None => settle(call.await),
    };

    match &outcome {
        LookupOutcome::Failed { reason } => tracing::warn!(%reason, "lookup failed"),
        LookupOutcome::Found { evidence } => {
            tracing::debug!(evidence = evidence.len(), "lookup found evidence");
        }
        LookupOutcome::NotFound => tracing::debug!("lookup found nothing"),
    }

    TaskReport {
        slot: task.slot(),
        query: task.query().to_string(),
        outcome,
        elapsed: started.elapsed(),
    }
}

fn settle(
    caught: std::result::Result<
        sleuth_lookups::Result<Vec<sleuth_lookups::Evidence>>,
        Box<dyn Any + Send>,
    >,
) -> LookupOutcome {
    match caught {
        Ok(result) => result.into(),
        Err(payload) => {
            LookupOutcome::failed(format!("lookup panicked: {}", panic_message(&*payload)))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Report for a task whose spawned future never handed back a result.
fn abandoned(task: &LookupTask, error: &JoinError) -> TaskReport {
    tracing::error!(source = %task.slot().source, "lookup task aborted: {error}");
    TaskReport {
        slot: task.slot(),
        query: task.query().to_string(),
        outcome: LookupOutcome::failed(format!("lookup task aborted: {error}")),
        elapsed: Duration::ZERO,
    }
}
