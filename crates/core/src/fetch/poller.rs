//! Timer-driven refresh of a single widget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use finboard_market_data::DataGateway;
use log::debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::dedupe::FetchResult;
use crate::widgets::Widget;

/// Receives the outcomes of a widget poller.
///
/// Dropping the handle stops the poller. After [`PollHandle::cancel`] no
/// further outcome is observed, even one fetched before the cancel.
pub struct PollHandle {
    receiver: watch::Receiver<Option<FetchResult>>,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Wait for the next outcome. `None` once the poller is cancelled or
    /// finished and every outcome has been seen.
    pub async fn next(&mut self) -> Option<FetchResult> {
        if self.is_cancelled() {
            return None;
        }
        self.receiver.changed().await.ok()?;
        if self.is_cancelled() {
            return None;
        }
        self.receiver.borrow_and_update().clone()
    }

    /// The most recent outcome, if any.
    pub fn latest(&self) -> Option<FetchResult> {
        if self.is_cancelled() {
            return None;
        }
        self.receiver.borrow().clone()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Poll `widget` every `refresh_ms`, starting immediately.
///
/// A `refresh_ms` of zero fetches once and stops. Failures are published
/// like any other outcome; the next tick is the only retry.
pub fn spawn_widget_poller(gateway: Arc<dyn DataGateway>, widget: &Widget) -> PollHandle {
    let request = widget.gateway_request();
    let period = Duration::from_millis(widget.refresh_ms);
    let widget_id = widget.id.clone();

    let (sender, receiver) = watch::channel(None);
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);

    let task = tokio::spawn(async move {
        if period.is_zero() {
            let outcome = gateway.fetch(&request).await;
            publish(&sender, &flag, outcome);
            debug!("Widget {} fetched once", widget_id);
            return;
        }

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let outcome = gateway.fetch(&request).await;
            if !publish(&sender, &flag, outcome) {
                debug!("Widget {} poller stopped", widget_id);
                break;
            }
        }
    });

    PollHandle {
        receiver,
        cancelled,
        task,
    }
}

/// Returns `false` once nobody can observe the outcome any more.
fn publish(
    sender: &watch::Sender<Option<FetchResult>>,
    cancelled: &AtomicBool,
    outcome: FetchResult,
) -> bool {
    if cancelled.load(Ordering::SeqCst) {
        return false;
    }
    sender.send(Some(outcome)).is_ok()
}
