//! Live stream client state machine.
//!
//! Consumes [`TransportEvent`]s strictly in arrival order and publishes the
//! resulting [`LiveState`]. The client never reconnects by itself; the
//! connection badge only mirrors what the transport reports.

use tokio::sync::{mpsc, watch};

use super::transport::TransportEvent;
use crate::domain::LiveState;

/// Single writer of the [`LiveState`] watch channel.
#[derive(Debug)]
pub struct LiveStreamClient {
    state: watch::Sender<LiveState>,
}

impl LiveStreamClient {
    /// Creates a client in the `Connecting` state with an empty buffer.
    #[must_use]
    pub fn new() -> (Self, watch::Receiver<LiveState>) {
        let (state, rx) = watch::channel(LiveState::default());
        (Self { state }, rx)
    }

    /// Applies one transport event. Observers are only woken when something
    /// visible changed.
    pub fn handle(&self, event: TransportEvent) {
        self.state.send_if_modified(|state| match event {
            TransportEvent::Open => state.record_open(),
            TransportEvent::Message(payload) => state.record_payload(&payload),
            TransportEvent::Error(reason) => {
                tracing::debug!(%reason, "stream transport error");
                state.record_error()
            }
        });
    }

    /// Runs until the transport side of the channel is closed.
    pub async fn run(self, mut events: mpsc::Receiver<TransportEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        tracing::debug!("live stream client stopped");
    }
}
