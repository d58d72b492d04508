//! Periodic snapshot poller.
//!
//! [`SnapshotPoller`] fires on a fixed interval, the first time immediately.
//! Every tick spawns one request into a [`JoinSet`]; a new tick never cancels
//! a request still in flight, and outcomes are applied in completion order.
//! Two overlapping polls may therefore land out of order, in which case the
//! later-completing one wins until the next tick.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use crate::domain::{PollState, Snapshot};
use crate::error::DashboardError;

/// Source of aggregate snapshots.
pub trait SnapshotSource: Send + Sync + 'static {
    /// Fetches one snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`DashboardError`] on transport, status, or decode failure.
    fn fetch(&self) -> impl Future<Output = Result<Snapshot, DashboardError>> + Send;
}

/// [`SnapshotSource`] backed by `GET {base}/stats`.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    url: String,
    timeout: Option<Duration>,
}

impl HttpSnapshotSource {
    /// Creates a source for the given stats URL.
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            timeout: None,
        }
    }

    /// Bounds each request, including reading the body.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// URL polled by this source.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self) -> Result<Snapshot, DashboardError> {
        let mut request = self.client.get(&self.url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Status { status });
        }
        let body = response.bytes().await?;
        Ok(Snapshot::from_slice(&body)?)
    }
}

/// Polls a [`SnapshotSource`] and publishes a [`PollState`].
///
/// The poller is the only writer of its watch channel.
#[derive(Debug)]
pub struct SnapshotPoller<S> {
    source: Arc<S>,
    interval: Duration,
    state: watch::Sender<PollState>,
}

impl<S: SnapshotSource> SnapshotPoller<S> {
    /// Creates a poller and the receiver observing its state.
    #[must_use]
    pub fn new(source: S, interval: Duration) -> (Self, watch::Receiver<PollState>) {
        let (state, rx) = watch::channel(PollState::default());
        let poller = Self {
            source: Arc::new(source),
            interval,
            state,
        };
        (poller, rx)
    }

    /// Runs until the task is aborted. Dropping the future drops the timer and
    /// aborts any request still in flight.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight: JoinSet<Result<Snapshot, DashboardError>> = JoinSet::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let source = Arc::clone(&self.source);
                    in_flight.spawn(async move { source.fetch().await });
                }
                Some(joined) = in_flight.join_next() => match joined {
                    Ok(outcome) => self.apply(outcome),
                    Err(err) => tracing::warn!(error = %err, "snapshot request task failed"),
                },
            }
        }
    }

    fn apply(&self, outcome: Result<Snapshot, DashboardError>) {
        self.state.send_modify(|state| {
            let transitioned = state.record(outcome);
            match (&state.error, transitioned) {
                (Some(reason), true) => tracing::warn!(%reason, "backend unreachable"),
                (None, true) => tracing::info!("backend reachable again"),
                (None, false) => tracing::debug!(
                    joined = state.snapshot.joined_count,
                    recent = state.snapshot.recent.len(),
                    "snapshot updated"
                ),
                (Some(_), false) => {}
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::JoinedEvent;

    /// Replays scripted outcomes, each after its own delay.
    #[derive(Debug, Default)]
    struct ScriptedSource {
        script: Mutex<VecDeque<(Duration, Result<Snapshot, DashboardError>)>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn push(&self, delay: Duration, outcome: Result<Snapshot, DashboardError>) {
            if let Ok(mut script) = self.script.lock() {
                script.push_back((delay, outcome));
            }
        }
    }

    impl SnapshotSource for Arc<ScriptedSource> {
        async fn fetch(&self) -> Result<Snapshot, DashboardError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
            match next {
                Some((delay, outcome)) => {
                    tokio::time::sleep(delay).await;
                    outcome
                }
                None => std::future::pending().await,
            }
        }
    }

    fn scenario_snapshot() -> Snapshot {
        Snapshot {
            orders_seen: 10,
            payments_seen: 8,
            joined_count: 5,
            recent: (1..=5).map(|i| JoinedEvent::new(format!("e{i}"))).collect(),
        }
    }

    fn network_error() -> DashboardError {
        DashboardError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }

    const INTERVAL: Duration = Duration::from_millis(3_000);

    #[tokio::test(start_paused = true)]
    async fn first_poll_is_immediate() {
        let source = Arc::new(ScriptedSource::default());
        source.push(Duration::ZERO, Ok(scenario_snapshot()));
        let (poller, mut rx) = SnapshotPoller::new(Arc::clone(&source), INTERVAL);
        let task = tokio::spawn(poller.run());

        let changed = tokio::time::timeout(Duration::from_millis(10), rx.changed()).await;
        assert!(matches!(changed, Ok(Ok(()))));
        assert_eq!(rx.borrow().snapshot, scenario_snapshot());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn failure_after_success_keeps_snapshot_then_clears() {
        let source = Arc::new(ScriptedSource::default());
        source.push(Duration::ZERO, Ok(scenario_snapshot()));
        source.push(Duration::ZERO, Err(network_error()));
        let mut recovered = scenario_snapshot();
        recovered.joined_count = 6;
        source.push(Duration::ZERO, Ok(recovered.clone()));

        let (poller, mut rx) = SnapshotPoller::new(Arc::clone(&source), INTERVAL);
        let task = tokio::spawn(poller.run());

        let _ = rx.changed().await;
        assert!(rx.borrow().error.is_none());

        let _ = rx.changed().await;
        {
            let state = rx.borrow();
            assert_eq!(state.snapshot, scenario_snapshot());
            assert_eq!(state.error.as_deref(), Some("io error: connection refused"));
        }

        let _ = rx.changed().await;
        {
            let state = rx.borrow();
            assert_eq!(state.snapshot, recovered);
            assert!(state.error.is_none());
        }
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn polls_on_fixed_interval_without_backoff() {
        let source = Arc::new(ScriptedSource::default());
        for _ in 0..4 {
            source.push(Duration::ZERO, Err(network_error()));
        }
        let (poller, _rx) = SnapshotPoller::new(Arc::clone(&source), INTERVAL);
        let task = tokio::spawn(poller.run());

        tokio::time::sleep(INTERVAL * 3 + Duration::from_millis(10)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn slow_request_is_not_cancelled_and_latest_completion_wins() {
        let source = Arc::new(ScriptedSource::default());
        let mut slow = scenario_snapshot();
        slow.joined_count = 1;
        let mut fast = scenario_snapshot();
        fast.joined_count = 2;
        // First poll takes longer than an interval; second completes first.
        source.push(INTERVAL + Duration::from_millis(500), Ok(slow.clone()));
        source.push(Duration::from_millis(100), Ok(fast.clone()));

        let (poller, mut rx) = SnapshotPoller::new(Arc::clone(&source), INTERVAL);
        let task = tokio::spawn(poller.run());

        let _ = rx.changed().await;
        assert_eq!(rx.borrow().snapshot, fast);

        let _ = rx.changed().await;
        assert_eq!(rx.borrow().snapshot, slow);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn abort_stops_polling() {
        let source = Arc::new(ScriptedSource::default());
        let (poller, _rx) = SnapshotPoller::new(Arc::clone(&source), INTERVAL);
        let task = tokio::spawn(poller.run());

        tokio::time::sleep(Duration::from_millis(10)).await;
        task.abort();
        let _ = task.await;

        tokio::time::sleep(INTERVAL * 5).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
