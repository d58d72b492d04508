//! Reconnecting Server-Sent-Events transport.
//!
//! [`SseTransport`] keeps one `GET {base}/events` request open, reports
//! open/error transitions and forwards every `message` event's data over an
//! mpsc channel. On any failure it waits for the reconnection delay and tries
//! again, forever. It stops only when the listening client goes away.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, HeaderValue};
use tokio::sync::mpsc;

use super::sse::SseDecoder;
use crate::config::MIN_INTERVAL;
use crate::error::DashboardError;

/// Header carrying the last seen event id on reconnect.
pub const LAST_EVENT_ID: &str = "Last-Event-ID";

/// Reconnect if the server sends nothing, not even a keep-alive comment,
/// for this long. The backend comments every 30 s.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// What the transport reports to the stream client, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The stream is open and events may follow.
    Open,
    /// Data of one `message` event.
    Message(String),
    /// The connection failed or dropped; a reconnect is scheduled.
    Error(String),
}

/// A push-stream transport driving a [`super::LiveStreamClient`].
pub trait LiveTransport: Send + 'static {
    /// Runs until `events` is closed, reconnecting on its own.
    fn run(self, events: mpsc::Sender<TransportEvent>) -> impl Future<Output = ()> + Send;
}

/// `text/event-stream` transport over `reqwest`.
#[derive(Debug, Clone)]
pub struct SseTransport {
    client: reqwest::Client,
    url: String,
    reconnect_delay: Duration,
    idle_timeout: Duration,
}

impl SseTransport {
    /// Creates a transport for the given events URL.
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            reconnect_delay,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Overrides the idle timeout.
    #[must_use]
    pub const fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Runs one connection until it fails.
    ///
    /// Returns `Ok(())` only when the listener has gone away.
    async fn stream_once(
        &self,
        decoder: &mut SseDecoder,
        events: &mpsc::Sender<TransportEvent>,
    ) -> Result<(), DashboardError> {
        let mut request = self
            .client
            .get(&self.url)
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        if let Some(id) = decoder.last_event_id().filter(|id| !id.is_empty()) {
            request = request.header(LAST_EVENT_ID, id);
        }

        let mut response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Status { status });
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !content_type.starts_with("text/event-stream") {
            return Err(DashboardError::UnexpectedContentType(content_type));
        }

        if events.send(TransportEvent::Open).await.is_err() {
            return Ok(());
        }
        tracing::info!(url = %self.url, "event stream open");

        loop {
            let chunk = tokio::time::timeout(self.idle_timeout, response.chunk())
                .await
                .map_err(|_| DashboardError::StreamIdle(self.idle_timeout))??;
            let Some(chunk) = chunk else {
                return Err(DashboardError::StreamClosed);
            };
            for event in decoder.feed(&chunk) {
                if !event.is_message() {
                    tracing::trace!(event_type = %event.event_type, "ignoring named event");
                    continue;
                }
                if events.send(TransportEvent::Message(event.data)).await.is_err() {
                    return Ok(());
                }
            }
        }
    }
}

impl LiveTransport for SseTransport {
    async fn run(self, events: mpsc::Sender<TransportEvent>) {
        let mut decoder = SseDecoder::new();
        loop {
            decoder.reset();
            let reason = match self.stream_once(&mut decoder, &events).await {
                Ok(()) => break,
                Err(err) => err.to_string(),
            };
            let delay = decoder
                .retry()
                .unwrap_or(self.reconnect_delay)
                .max(MIN_INTERVAL);
            tracing::warn!(url = %self.url, %reason, retry_ms = delay.as_millis(), "event stream dropped");

            if events.send(TransportEvent::Error(reason)).await.is_err() {
                break;
            }
            tokio::time::sleep(delay).await;
        }
        tracing::debug!(url = %self.url, "event stream transport stopped");
    }
}
