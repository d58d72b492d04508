//! Dashboard error types.
//!
//! [`DashboardError`] is the central error type for the dashboard. Its
//! `Display` output doubles as the human-readable reason shown in the
//! "cannot reach backend" banner, so every message is written for the
//! operator looking at the screen.

use reqwest::StatusCode;

/// Client-side error enum covering both data sources and startup.
///
/// # Categories
///
/// | Variant                   | Raised by              | Surfaced as            |
/// |---------------------------|------------------------|------------------------|
/// | `Transport`               | poller, SSE transport  | banner / badge         |
/// | `Status`                  | poller, SSE transport  | banner / badge         |
/// | `Decode`                  | poller, stream client  | banner / dropped record|
/// | `UnexpectedContentType`   | SSE transport          | badge                  |
/// | `StreamClosed`            | SSE transport          | badge                  |
/// | `StreamIdle`              | SSE transport          | badge                  |
/// | `Config`, `Io`            | startup                | process exit           |
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The HTTP request could not be completed (connect, timeout, read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    #[error("HTTP {status}")]
    Status {
        /// Status code returned by the backend.
        status: StatusCode,
    },

    /// The payload was not valid JSON of the expected shape.
    #[error("invalid payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The event stream answered with something other than `text/event-stream`.
    #[error("unexpected content type: {0}")]
    UnexpectedContentType(String),

    /// The server ended the event stream.
    #[error("event stream closed by server")]
    StreamClosed,

    /// Nothing, not even a keep-alive comment, arrived for too long.
    #[error("event stream idle for {}s", .0.as_secs())]
    StreamIdle(std::time::Duration),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Terminal or filesystem I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
