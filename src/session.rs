//! Dashboard session: owns every background task of one dashboard view.
//!
//! Tasks live in a [`JoinSet`], so dropping the session aborts the poll timer,
//! any in-flight snapshot request and the event-stream connection. No task
//! outlives the view that started it.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

use crate::config::DashboardConfig;
use crate::domain::{LiveState, PollState};
use crate::error::DashboardError;
use crate::service::{DisplayList, HttpSnapshotSource, SnapshotPoller, SnapshotSource, reconcile};
use crate::stream::{LiveStreamClient, LiveTransport, SseTransport};

/// Capacity used by [`DashboardSession::spawn`] for the transport channel.
pub const DEFAULT_STREAM_CHANNEL_CAPACITY: usize = 256;

/// Running poller + stream client with read access to their state.
#[derive(Debug)]
pub struct DashboardSession {
    poll: watch::Receiver<PollState>,
    live: watch::Receiver<LiveState>,
    tasks: JoinSet<()>,
}

impl DashboardSession {
    /// Starts polling `{base}/stats` and streaming `{base}/events`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Transport`] if the HTTP client cannot be built.
    pub fn connect(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        let source = HttpSnapshotSource::new(client.clone(), config.stats_url())
            .with_timeout(config.request_timeout);
        let transport = SseTransport::new(client, config.events_url(), config.reconnect_delay)
            .with_idle_timeout(config.stream_idle_timeout);

        tracing::info!(
            stats = source.url(),
            events = %config.events_url(),
            "starting dashboard session"
        );
        Ok(Self::spawn_with_capacity(
            source,
            transport,
            config.poll_interval,
            config.stream_channel_capacity,
        ))
    }

    /// Starts a session over arbitrary sources.
    #[must_use]
    pub fn spawn<S, T>(source: S, transport: T, poll_interval: Duration) -> Self
    where
        S: SnapshotSource,
        T: LiveTransport,
    {
        Self::spawn_with_capacity(
            source,
            transport,
            poll_interval,
            DEFAULT_STREAM_CHANNEL_CAPACITY,
        )
    }

    fn spawn_with_capacity<S, T>(
        source: S,
        transport: T,
        poll_interval: Duration,
        channel_capacity: usize,
    ) -> Self
    where
        S: SnapshotSource,
        T: LiveTransport,
    {
        let mut tasks = JoinSet::new();

        let (poller, poll) = SnapshotPoller::new(source, poll_interval);
        tasks.spawn(poller.run());

        let (client, live) = LiveStreamClient::new();
        let (events_tx, events_rx) = mpsc::channel(channel_capacity.max(1));
        tasks.spawn(transport.run(events_tx));
        tasks.spawn(client.run(events_rx));

        Self { poll, live, tasks }
    }

    /// Current poller state.
    #[must_use]
    pub fn poll_state(&self) -> watch::Ref<'_, PollState> {
        self.poll.borrow()
    }

    /// Current live stream state.
    #[must_use]
    pub fn live_state(&self) -> watch::Ref<'_, LiveState> {
        self.live.borrow()
    }

    /// Runs `f` over the reconciled display list.
    ///
    /// Both states stay borrowed for the duration of `f`; keep it short.
    pub fn display<R>(&self, f: impl FnOnce(&DisplayList<'_>) -> R) -> R {
        let poll = self.poll.borrow();
        let live = self.live.borrow();
        f(&reconcile(&live.buffer, &poll.snapshot))
    }

    /// Resolves when either state has changed since it was last observed
    /// through this method.
    ///
    /// If one side's task has stopped, only the other side is awaited.
    pub async fn changed(&mut self) {
        tokio::select! {
            Ok(()) = self.poll.changed() => {}
            Ok(()) = self.live.changed() => {}
            else => std::future::pending::<()>().await,
        }
    }

    /// Number of tasks still owned by the session.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Aborts every task and waits for them to finish.
    pub async fn shutdown(mut self) {
        let tasks = self.task_count();
        self.tasks.shutdown().await;
        tracing::info!(tasks, "dashboard session stopped");
    }
}
