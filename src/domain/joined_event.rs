//! A single order/payment join result as emitted by the backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One order merged with its payment.
///
/// Only `order_id` is expected on the wire, and even that may be missing or
/// `null` after a bad join; it then decodes as the empty string. Every other
/// field treats `null` and absent identically. Unknown fields (such as the
/// `user_id` carried over from the order record) are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JoinedEvent {
    /// Order identifier. Not unique across retries.
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_id: String,

    /// Order status (e.g. `"delivered"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_status: Option<String>,

    /// Payment method (e.g. `"credit_card"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,

    /// Payment amount. Accepts a JSON number or a numeric string; anything
    /// else decodes as missing.
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_value: Option<f64>,

    /// Purchase timestamp, kept verbatim for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_purchase_timestamp: Option<String>,
}

impl JoinedEvent {
    /// Creates an event with only the order id set.
    #[must_use]
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            ..Self::default()
        }
    }

    /// Sets the payment amount.
    #[must_use]
    pub fn with_payment_value(mut self, value: f64) -> Self {
        self.payment_value = Some(value);
        self
    }

    /// Sets the order status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.order_status = Some(status.into());
        self
    }

    /// Sets the payment type.
    #[must_use]
    pub fn with_payment_type(mut self, payment_type: impl Into<String>) -> Self {
        self.payment_type = Some(payment_type.into());
        self
    }

    /// Decodes one live-stream payload.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the payload is not a JSON object of
    /// the expected shape.
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// Decodes `null` as `T::default()`, so `null` and an absent field agree.
pub(super) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(amount.filter(|n| n.is_finite()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn full_record_decodes() {
        let json = r#"{
            "order_id": "e481f51cbdc54678b7cc49136f2d6af7",
            "user_id": "9ef432eb6251297304e76186b10a928d",
            "order_status": "delivered",
            "order_purchase_timestamp": "2017-10-02T10:56:33",
            "payment_type": "credit_card",
            "payment_value": 18.12
        }"#;
        let Ok(event) = JoinedEvent::from_json(json) else {
            panic!("valid record");
        };
        assert_eq!(event.order_id, "e481f51cbdc54678b7cc49136f2d6af7");
        assert_eq!(event.order_status.as_deref(), Some("delivered"));
        assert_eq!(event.payment_type.as_deref(), Some("credit_card"));
        assert_eq!(event.payment_value, Some(18.12));
        assert_eq!(
            event.order_purchase_timestamp.as_deref(),
            Some("2017-10-02T10:56:33")
        );
    }

    #[test]
    fn null_and_absent_are_identical() {
        let absent = JoinedEvent::from_json(r#"{"order_id":"a"}"#).ok();
        let nulls = JoinedEvent::from_json(
            r#"{"order_id":"a","order_status":null,"payment_type":null,
                "payment_value":null,"order_purchase_timestamp":null}"#,
        )
        .ok();
        assert!(absent.is_some());
        assert_eq!(absent, nulls);
    }

    #[test]
    fn missing_order_id_decodes_empty() {
        let Ok(event) = JoinedEvent::from_json(r#"{"order_id":null,"payment_value":3}"#) else {
            panic!("null id should be tolerated");
        };
        assert!(event.order_id.is_empty());

        let Ok(event) = JoinedEvent::from_json("{}") else {
            panic!("empty object should be tolerated");
        };
        assert!(event.order_id.is_empty());
    }

    #[test]
    fn string_amount_is_coerced() {
        let Ok(event) = JoinedEvent::from_json(r#"{"order_id":"a","payment_value":"99.90"}"#)
        else {
            panic!("numeric string should decode");
        };
        assert_eq!(event.payment_value, Some(99.9));
    }

    #[test]
    fn unusable_amount_renders_as_missing() {
        for payload in [
            r#"{"order_id":"a","payment_value":"n/a"}"#,
            r#"{"order_id":"a","payment_value":""}"#,
            r#"{"order_id":"a","payment_value":"NaN"}"#,
            r#"{"order_id":"a","payment_value":{"amount":3}}"#,
        ] {
            let Ok(event) = JoinedEvent::from_json(payload) else {
                panic!("record with a bad amount should still decode: {payload}");
            };
            assert_eq!(event.order_id, "a");
            assert_eq!(event.payment_value, None);
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(JoinedEvent::from_json("not json").is_err());
        assert!(JoinedEvent::from_json("[1,2,3]").is_err());
        assert!(JoinedEvent::from_json(r#"{"order_id":42}"#).is_err());
    }
}
