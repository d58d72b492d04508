//! Aggregate snapshot returned by `GET /stats`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::JoinedEvent;
use super::joined_event::null_as_default;

/// Counters and a bounded, oldest-first history of joined events.
///
/// Replaced wholesale on every successful poll; never merged. Counters the
/// backend omits or sends as `null` decode as zero, and history entries that
/// are not joined-event records are skipped instead of failing the poll.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Orders consumed by the backend.
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders_seen: u64,
    /// Payments consumed by the backend.
    #[serde(default, deserialize_with = "null_as_default")]
    pub payments_seen: u64,
    /// Successful order/payment joins.
    #[serde(default, deserialize_with = "null_as_default")]
    pub joined_count: u64,
    /// Most recent joins, oldest first.
    #[serde(default, deserialize_with = "lenient_history")]
    pub recent: Vec<JoinedEvent>,
}

impl Snapshot {
    /// Decodes a snapshot body.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the body is not a snapshot object.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<JoinedEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let total = raw.len();
    let recent: Vec<JoinedEvent> = raw
        .into_iter()
        .filter_map(|value| match JoinedEvent::deserialize(value) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::debug!(error = %err, "skipping malformed history record");
                None
            }
        })
        .collect();
    if recent.len() < total {
        tracing::debug!(kept = recent.len(), total, "snapshot history had malformed records");
    }
    Ok(recent)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_payload() {
        let body = br#"{"orders_seen":10,"payments_seen":8,"joined_count":5,
            "recent":[{"order_id":"e1"},{"order_id":"e2","payment_value":1.5}]}"#;
        let Ok(snapshot) = Snapshot::from_slice(body) else {
            panic!("valid snapshot");
        };
        assert_eq!(snapshot.orders_seen, 10);
        assert_eq!(snapshot.payments_seen, 8);
        assert_eq!(snapshot.joined_count, 5);
        assert_eq!(snapshot.recent.len(), 2);
        assert_eq!(
            snapshot.recent.first().map(|e| e.order_id.as_str()),
            Some("e1")
        );
    }

    #[test]
    fn missing_fields_default() {
        let Ok(snapshot) = Snapshot::from_slice(b"{}") else {
            panic!("empty object is a valid snapshot");
        };
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn null_counters_decode_as_zero() {
        let body = br#"{"orders_seen":null,"payments_seen":3,"joined_count":null,"recent":[]}"#;
        let Ok(snapshot) = Snapshot::from_slice(body) else {
            panic!("null counters should be tolerated");
        };
        assert_eq!(snapshot.orders_seen, 0);
        assert_eq!(snapshot.payments_seen, 3);
        assert_eq!(snapshot.joined_count, 0);
    }

    #[test]
    fn null_history_decodes_as_empty() {
        let body = br#"{"orders_seen":4,"payments_seen":3,"joined_count":2,"recent":null}"#;
        let Ok(snapshot) = Snapshot::from_slice(body) else {
            panic!("null history should be tolerated");
        };
        assert_eq!(snapshot.orders_seen, 4);
        assert!(snapshot.recent.is_empty());
    }

    #[test]
    fn bad_history_record_keeps_the_counters() {
        let body = br#"{"orders_seen":500,"payments_seen":480,"joined_count":450,
            "recent":[{"order_id":"ok","payment_value":12.5},
                      {"order_id":"x","payment_value":"n/a"},
                      42,
                      {"order_id":["not","a","string"]},
                      {"order_id":"last"}]}"#;
        let Ok(snapshot) = Snapshot::from_slice(body) else {
            panic!("one bad record must not fail the whole snapshot");
        };
        assert_eq!(snapshot.orders_seen, 500);
        assert_eq!(snapshot.joined_count, 450);
        let ids: Vec<&str> = snapshot.recent.iter().map(|e| e.order_id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "x", "last"]);
        assert_eq!(
            snapshot.recent.get(1).map(|e| e.payment_value),
            Some(None)
        );
    }

    #[test]
    fn negative_counter_is_rejected() {
        assert!(Snapshot::from_slice(br#"{"orders_seen":-1}"#).is_err());
        assert!(Snapshot::from_slice(b"<html>").is_err());
    }
}
