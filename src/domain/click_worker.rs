//! Best-effort click accounting.
//!
//! [`ClickDispatcher`] is the producer half: a non-blocking handle onto a bounded
//! queue. [`run_click_worker`] drains the queue with bounded concurrency. Events
//! are dropped when the queue is full and failed increments are logged, never
//! retried, so a click is counted at most once.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::StatsRepository;

/// Producer handle for click events.
#[derive(Debug, Clone)]
pub struct ClickDispatcher {
    tx: mpsc::Sender<ClickEvent>,
}

impl ClickDispatcher {
    /// Creates a dispatcher with its receiving end.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ClickEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Enqueues a click without waiting. Returns `false` if the event was dropped.
    pub fn dispatch(&self, event: ClickEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                metrics::counter!("shorty_clicks_dropped_total").increment(1);
                tracing::warn!(
                    link_id = event.link_id,
                    code = %event.code,
                    "Click queue full, dropping event"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                metrics::counter!("shorty_clicks_dropped_total").increment(1);
                tracing::error!(
                    link_id = event.link_id,
                    code = %event.code,
                    "Click worker is not running, dropping event"
                );
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Free slots in the queue.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}

/// Drains click events into the counter store until every sender is dropped.
///
/// At most `concurrency` increments are in flight. In-flight increments are
/// awaited before returning.
pub async fn run_click_worker<S>(
    mut rx: mpsc::Receiver<ClickEvent>,
    stats_repository: Arc<S>,
    concurrency: usize,
) where
    S: StatsRepository + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    tracing::info!(concurrency, "Click worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let repository = stats_repository.clone();

        tasks.spawn(async move {
            let _permit = permit;
            if let Err(e) = repository.record_click(event.link_id).await {
                metrics::counter!("shorty_clicks_failed_total").increment(1);
                tracing::warn!(
                    link_id = event.link_id,
                    code = %event.code,
                    error = %e,
                    "Failed to record click"
                );
            }
        });

        // Reap finished tasks so the set does not grow with traffic.
        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}

    tracing::info!("Click worker stopped");
}
