//! Cell formatting for counters and event rows.

use crate::domain::JoinedEvent;

/// Shown for any absent field.
pub const PLACEHOLDER: &str = "—";

/// Characters of the order id kept in the table.
pub const ORDER_ID_PREFIX: usize = 12;

/// Formats a counter with `,` thousands separators.
#[must_use]
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Two-decimal amount, or the placeholder.
#[must_use]
pub fn format_amount(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// First [`ORDER_ID_PREFIX`] characters followed by `…`, or the placeholder
/// for a missing id.
#[must_use]
pub fn short_order_id(order_id: &str) -> String {
    if order_id.is_empty() {
        return PLACEHOLDER.to_string();
    }
    let prefix: String = order_id.chars().take(ORDER_ID_PREFIX).collect();
    format!("{prefix}…")
}

/// Field text or the placeholder.
#[must_use]
pub fn or_placeholder(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

/// Table cells for one event: id, status, payment type, amount, purchase time.
#[must_use]
pub fn event_cells(event: &JoinedEvent) -> [String; 5] {
    [
        short_order_id(&event.order_id),
        or_placeholder(event.order_status.as_deref()).to_string(),
        or_placeholder(event.payment_type.as_deref()).to_string(),
        format_amount(event.payment_value),
        or_placeholder(event.order_purchase_timestamp.as_deref()).to_string(),
    ]
}
