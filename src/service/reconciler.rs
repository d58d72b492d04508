//! Selects which data source drives the events table.
//!
//! The live stream is authoritative as soon as one event has arrived. Until
//! then the snapshot's `recent` history is shown so the table is never blank
//! on first paint.

use std::fmt;

use crate::domain::{JoinedEvent, LiveBuffer, Snapshot};

/// Number of snapshot records shown while the live buffer is empty.
pub const RECENT_WINDOW: usize = 50;

/// Which source produced a [`DisplayList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplaySource {
    /// Rows come from the live buffer.
    Live,
    /// Rows come from the snapshot's recent history.
    Recent,
}

impl DisplaySource {
    /// Short label used in the table title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Recent => "recent",
        }
    }
}

/// Stable identity of one displayed row.
///
/// `order_id` alone can repeat inside the window, so the amount and the
/// position are part of the key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowKey<'a> {
    /// Order identifier, possibly empty.
    pub order_id: &'a str,
    /// Payment amount, if present.
    pub payment_value: Option<f64>,
    /// Zero-based position in the display list.
    pub position: usize,
}

impl fmt::Display for RowKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payment_value {
            Some(value) => write!(f, "{}-{}-{}", self.order_id, value, self.position),
            None => write!(f, "{}--{}", self.order_id, self.position),
        }
    }
}

/// Newest-first, bounded list of records to display.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList<'a> {
    source: DisplaySource,
    events: Vec<&'a JoinedEvent>,
}

impl<'a> DisplayList<'a> {
    /// Source that drove this list.
    #[must_use]
    pub const fn source(&self) -> DisplaySource {
        self.source
    }

    /// Records, newest first.
    #[must_use]
    pub fn events(&self) -> &[&'a JoinedEvent] {
        &self.events
    }

    /// Records paired with their row keys.
    pub fn rows(&self) -> impl Iterator<Item = (RowKey<'a>, &'a JoinedEvent)> + '_ {
        self.events.iter().copied().enumerate().map(|(position, event)| {
            let key = RowKey {
                order_id: &event.order_id,
                payment_value: event.payment_value,
                position,
            };
            (key, event)
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` when neither source has anything to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Derives the display list from the two sources.
///
/// A non-empty live buffer is returned verbatim. Otherwise the last
/// [`RECENT_WINDOW`] entries of `snapshot.recent` are returned newest-first.
#[must_use]
pub fn reconcile<'a>(live: &'a LiveBuffer, snapshot: &'a Snapshot) -> DisplayList<'a> {
    if !live.is_empty() {
        return DisplayList {
            source: DisplaySource::Live,
            events: live.iter().collect(),
        };
    }

    let skip = snapshot.recent.len().saturating_sub(RECENT_WINDOW);
    DisplayList {
        source: DisplaySource::Recent,
        events: snapshot.recent.iter().skip(skip).rev().collect(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn event(id: &str) -> JoinedEvent {
        JoinedEvent::new(id)
    }

    fn ids<'a>(list: &DisplayList<'a>) -> Vec<&'a str> {
        list.events()
            .iter()
            .copied()
            .map(|e| e.order_id.as_str())
            .collect()
    }

    fn scenario_a() -> Snapshot {
        Snapshot {
            orders_seen: 10,
            payments_seen: 8,
            joined_count: 5,
            recent: (1..=5).map(|i| event(&format!("e{i}"))).collect(),
        }
    }

    #[test]
    fn empty_buffer_shows_recent_reversed() {
        let live = LiveBuffer::new();
        let snapshot = scenario_a();
        let list = reconcile(&live, &snapshot);
        assert_eq!(list.source(), DisplaySource::Recent);
        assert_eq!(ids(&list), vec!["e5", "e4", "e3", "e2", "e1"]);
    }

    #[test]
    fn live_buffer_takes_precedence() {
        let mut live = LiveBuffer::new();
        live.push(event("e6"));
        live.push(event("e7"));
        let snapshot = scenario_a();
        let list = reconcile(&live, &snapshot);
        assert_eq!(list.source(), DisplaySource::Live);
        assert_eq!(ids(&list), vec!["e7", "e6"]);
    }

    #[test]
    fn recent_window_is_capped() {
        let live = LiveBuffer::new();
        let snapshot = Snapshot {
            recent: (1..=200).map(|i| event(&format!("r{i}"))).collect(),
            ..Snapshot::default()
        };
        let list = reconcile(&live, &snapshot);
        assert_eq!(list.len(), RECENT_WINDOW);
        assert_eq!(ids(&list).first().copied(), Some("r200"));
        assert_eq!(ids(&list).last().copied(), Some("r151"));
    }

    #[test]
    fn both_empty_yields_empty_list() {
        let live = LiveBuffer::new();
        let snapshot = Snapshot::default();
        let list = reconcile(&live, &snapshot);
        assert!(list.is_empty());
        assert_eq!(list.source(), DisplaySource::Recent);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut live = LiveBuffer::new();
        let snapshot = scenario_a();
        assert_eq!(reconcile(&live, &snapshot), reconcile(&live, &snapshot));

        live.push(event("e9"));
        let first = reconcile(&live, &snapshot);
        let second = reconcile(&live, &snapshot);
        assert_eq!(first, second);
        assert_eq!(snapshot, scenario_a());
    }

    #[test]
    fn full_live_buffer_is_returned_unchanged() {
        let mut live = LiveBuffer::new();
        for i in 1..=105 {
            live.push(event(&format!("m{i}")));
        }
        let snapshot = scenario_a();
        let list = reconcile(&live, &snapshot);
        let expected: Vec<&JoinedEvent> = live.iter().collect();
        assert_eq!(list.events(), expected.as_slice());
    }

    #[test]
    fn duplicate_ids_get_distinct_keys() {
        let mut live = LiveBuffer::new();
        live.push(event("dup").with_payment_value(10.0));
        live.push(event("dup").with_payment_value(10.0));
        live.push(event(""));
        let snapshot = Snapshot::default();
        let list = reconcile(&live, &snapshot);

        let keys: Vec<String> = list.rows().map(|(key, _)| key.to_string()).collect();
        assert_eq!(keys, vec!["--0", "dup-10-1", "dup-10-2"]);
    }
}
