//! State owned by the snapshot poller.

use chrono::{DateTime, Utc};

use super::Snapshot;
use crate::error::DashboardError;

/// Latest snapshot plus the reachability error, if any.
///
/// A failed poll never touches `snapshot`: stale-but-valid data stays on
/// screen while `error` explains why it is stale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollState {
    /// Last successfully decoded snapshot.
    pub snapshot: Snapshot,
    /// Human-readable reason of the last failed poll, cleared on success.
    pub error: Option<String>,
    /// Completion time of the last successful poll.
    pub last_success: Option<DateTime<Utc>>,
}

impl PollState {
    /// Applies the outcome of one poll.
    ///
    /// Returns `true` if the error flag flipped (healthy ↔ failing), which the
    /// poller uses to log transitions only once.
    pub fn record(&mut self, outcome: Result<Snapshot, DashboardError>) -> bool {
        let was_failing = self.is_failing();
        match outcome {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.error = None;
                self.last_success = Some(Utc::now());
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }
        was_failing != self.is_failing()
    }

    /// Returns `true` while the backend is unreachable.
    #[must_use]
    pub fn is_failing(&self) -> bool {
        self.error.is_some()
    }
}
