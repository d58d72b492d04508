//! Bounded, newest-first ring of live events.

use std::collections::VecDeque;

use super::JoinedEvent;

/// Maximum number of live events kept for display.
pub const LIVE_BUFFER_CAPACITY: usize = 100;

/// Newest-first list of events received from the push stream.
///
/// Never holds more than [`LIVE_BUFFER_CAPACITY`] entries: pushing onto a full
/// buffer evicts the oldest (last) entry. The buffer survives reconnects and
/// is only emptied by dropping it.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveBuffer {
    events: VecDeque<JoinedEvent>,
}

impl LiveBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: VecDeque::with_capacity(LIVE_BUFFER_CAPACITY),
        }
    }

    /// Prepends an event, evicting the oldest one when over capacity.
    pub fn push(&mut self, event: JoinedEvent) {
        self.events.push_front(event);
        self.events.truncate(LIVE_BUFFER_CAPACITY);
    }

    /// Iterates newest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &JoinedEvent> + '_ {
        self.events.iter()
    }

    /// Most recently received event.
    #[must_use]
    pub fn newest(&self) -> Option<&JoinedEvent> {
        self.events.front()
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` until the first live event arrives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for LiveBuffer {
    fn default() -> Self {
        Self::new()
    }
}
