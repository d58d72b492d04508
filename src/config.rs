//! Dashboard configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Only the API base path is strictly
//! needed; everything else has a default matching the backend's cadence.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::DashboardError;

/// Default base path shared by the snapshot and event-stream endpoints.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level dashboard configuration.
///
/// Loaded once at startup via [`DashboardConfig::from_env`].
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base path for both endpoints, without trailing slash
    /// (e.g. `http://127.0.0.1:8000/api`).
    pub api_base: String,

    /// Interval between snapshot polls.
    pub poll_interval: Duration,

    /// Delay before the event stream reconnects after a drop. The server may
    /// override it with an SSE `retry:` field.
    pub reconnect_delay: Duration,

    /// Timeout applied to each snapshot request and to connection setup.
    pub request_timeout: Duration,

    /// Silence after which the event stream is dropped and reopened.
    pub stream_idle_timeout: Duration,

    /// Capacity of the channel between the SSE transport and the stream client.
    pub stream_channel_capacity: usize,

    /// Optional log file. The terminal belongs to the UI, so logs only go to
    /// stderr when this is unset and stderr is redirected.
    pub log_file: Option<PathBuf>,

    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval: Duration::from_millis(3_000),
            reconnect_delay: Duration::from_millis(3_000),
            request_timeout: Duration::from_secs(5),
            stream_idle_timeout: Duration::from_secs(90),
            stream_channel_capacity: 256,
            log_file: None,
            log_format: LogFormat::Text,
        }
    }
}

impl DashboardConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is missing or unparsable.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if `DASHBOARD_API_BASE` is set to an
    /// empty value.
    pub fn from_env() -> Result<Self, DashboardError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if `DASHBOARD_API_BASE` is empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DashboardError> {
        let defaults = Self::default();
        let api_base = lookup("DASHBOARD_API_BASE").unwrap_or(defaults.api_base);

        Ok(Self {
            api_base: normalize_base(&api_base)?,
            poll_interval: Duration::from_millis(parse_value(
                lookup("DASHBOARD_POLL_INTERVAL_MS"),
                3_000_u64,
            ))
            .max(MIN_INTERVAL),
            reconnect_delay: Duration::from_millis(parse_value(
                lookup("DASHBOARD_RECONNECT_DELAY_MS"),
                3_000_u64,
            ))
            .max(MIN_INTERVAL),
            request_timeout: Duration::from_secs(
                parse_value(lookup("DASHBOARD_REQUEST_TIMEOUT_SECS"), 5_u64).max(1),
            ),
            stream_idle_timeout: Duration::from_secs(
                parse_value(lookup("DASHBOARD_STREAM_IDLE_TIMEOUT_SECS"), 90_u64).max(1),
            ),
            stream_channel_capacity: parse_value(
                lookup("DASHBOARD_STREAM_CHANNEL_CAPACITY"),
                256_usize,
            )
            .max(1),
            log_file: lookup("DASHBOARD_LOG_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            log_format: parse_log_format(lookup("DASHBOARD_LOG_FORMAT").as_deref()),
        })
    }

    /// URL of the aggregate snapshot endpoint.
    #[must_use]
    pub fn stats_url(&self) -> String {
        format!("{}/stats", self.api_base)
    }

    /// URL of the event-stream endpoint.
    #[must_use]
    pub fn events_url(&self) -> String {
        format!("{}/events", self.api_base)
    }
}

/// Lower bound for the poll interval and reconnect delay.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Trims whitespace and trailing slashes from the configured base path.
///
/// # Errors
///
/// Returns [`DashboardError::Config`] when nothing is left after trimming.
pub fn normalize_base(raw: &str) -> Result<String, DashboardError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(DashboardError::Config(
            "DASHBOARD_API_BASE must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Parses a raw setting as `T`, returning `default` on missing or invalid
/// values.
fn parse_value<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Accepts `"json"` (case-insensitive); anything else means text.
fn parse_log_format(raw: Option<&str>) -> LogFormat {
    match raw {
        Some(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}
