//! State owned by the live stream client.

use super::{ConnectionState, JoinedEvent, LiveBuffer};

/// Live buffer and connection badge state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveState {
    /// Newest-first live events.
    pub buffer: LiveBuffer,
    /// Last state reported by the transport.
    pub connection: ConnectionState,
    /// Malformed records dropped so far. Diagnostics only.
    pub discarded: u64,
}

impl LiveState {
    /// Transport reported the stream open.
    ///
    /// Returns `true` if the state changed.
    pub fn record_open(&mut self) -> bool {
        self.set_connection(ConnectionState::Connected)
    }

    /// Transport reported an error. The buffer is kept.
    ///
    /// Returns `true` if the state changed.
    pub fn record_error(&mut self) -> bool {
        self.set_connection(ConnectionState::Disconnected)
    }

    /// Decodes one message payload and prepends it to the buffer.
    ///
    /// Malformed payloads are counted and dropped. Returns `true` if the
    /// buffer changed.
    pub fn record_payload(&mut self, payload: &str) -> bool {
        match JoinedEvent::from_json(payload) {
            Ok(event) => {
                self.buffer.push(event);
                true
            }
            Err(err) => {
                self.discarded = self.discarded.saturating_add(1);
                tracing::debug!(error = %err, discarded = self.discarded, "dropping malformed live record");
                false
            }
        }
    }

    fn set_connection(&mut self, next: ConnectionState) -> bool {
        if self.connection == next {
            return false;
        }
        tracing::debug!(from = %self.connection, to = %next, "stream connection state");
        self.connection = next;
        true
    }
}
