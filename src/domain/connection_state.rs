//! Push-stream connection state as reported by the transport.

use std::fmt;

/// Lifecycle of the single live-stream connection.
///
/// Only the stream client writes this. It never drives reconnection itself;
/// it mirrors whatever the transport last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// First connection attempt in flight.
    #[default]
    Connecting,
    /// Transport reported the stream open.
    Connected,
    /// Transport reported an error; it is reconnecting on its own.
    Disconnected,
}

impl ConnectionState {
    /// Returns `true` while events can arrive.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Text shown in the connection badge.
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Connected => "Live",
            Self::Connecting | Self::Disconnected => "Connecting…",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_connecting() {
        assert_eq!(ConnectionState::default(), ConnectionState::Connecting);
    }

    #[test]
    fn badge_text() {
        assert_eq!(ConnectionState::Connected.badge(), "Live");
        assert_eq!(ConnectionState::Connecting.badge(), "Connecting…");
        assert_eq!(ConnectionState::Disconnected.badge(), "Connecting…");
        assert!(ConnectionState::Connected.is_live());
        assert!(!ConnectionState::Disconnected.is_live());
    }
}
