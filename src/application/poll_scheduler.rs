// Poll scheduler - Runs the metrics source on a fixed interval while the panel is shown
use crate::application::metrics_source::MetricsSource;
use crate::domain::metrics::FetchResult;
use crate::domain::panel::PollInterval;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

/// Result of one fetch, tagged so the consumer can discard stale responses.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub epoch: u64,
    pub request_id: u64,
    pub result: FetchResult,
}

/// Owns at most one ticker task. Every `start` opens a new epoch.
pub struct PollScheduler {
    source: Arc<dyn MetricsSource>,
    outcomes: mpsc::UnboundedSender<PollOutcome>,
    ticker: Option<JoinHandle<()>>,
    interval: Option<PollInterval>,
    epoch: u64,
    requests: Arc<AtomicU64>,
}

impl PollScheduler {
    pub fn new(source: Arc<dyn MetricsSource>, outcomes: mpsc::UnboundedSender<PollOutcome>) -> Self {
        Self {
            source,
            outcomes,
            ticker: None,
            interval: None,
            epoch: 0,
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetch immediately, then every `interval`. Any running ticker is cancelled first.
    pub fn start(&mut self, interval: PollInterval) {
        self.stop();
        self.epoch += 1;
        let epoch = self.epoch;

        self.fetch_once();

        let period = interval.as_duration();
        let mut timer = tokio::time::interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let source = self.source.clone();
        let outcomes = self.outcomes.clone();
        let requests = self.requests.clone();
        let handle = tokio::spawn(async move {
            let mut ticks = IntervalStream::new(timer);
            while ticks.next().await.is_some() {
                if outcomes.is_closed() {
                    break;
                }
                spawn_fetch(source.clone(), outcomes.clone(), &requests, epoch);
            }
        });

        self.ticker = Some(handle);
        self.interval = Some(interval);
        tracing::debug!("Polling started (epoch {}, every {}ms)", epoch, interval.as_millis());
    }

    /// Cancel the pending repeat. Calling this while stopped is a no-op.
    pub fn stop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
            tracing::debug!("Polling stopped (epoch {})", self.epoch);
        }
        self.interval = None;
    }

    pub fn restart(&mut self, interval: PollInterval) {
        self.stop();
        self.start(interval);
    }

    /// One fetch outside the timer, attributed to the current epoch.
    pub fn fetch_once(&self) {
        spawn_fetch(self.source.clone(), self.outcomes.clone(), &self.requests, self.epoch);
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn interval(&self) -> Option<PollInterval> {
        self.interval
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_fetch(
    source: Arc<dyn MetricsSource>,
    outcomes: mpsc::UnboundedSender<PollOutcome>,
    requests: &AtomicU64,
    epoch: u64,
) {
    // Ids are handed out at issue time so they order requests, not responses
    let request_id = requests.fetch_add(1, Ordering::Relaxed) + 1;
    tokio::spawn(async move {
        let result = source.fetch_snapshot().await;
        if let Err(e) = &result {
            tracing::debug!("Fetch {} (epoch {}) failed: {}", request_id, epoch, e);
        }
        // The receiver is gone once the panel is torn down
        let _ = outcomes.send(PollOutcome {
            epoch,
            request_id,
            result,
        });
    });
}
