//! Normalized order record extracted from a Shopify order payload.
//!
//! Shopify order payloads are large and loosely typed, so extraction walks a
//! `serde_json::Value` and falls back to empty values instead of failing.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Column used as the upsert merge key.
pub const ORDER_ID_FIELD: &str = "Shopify Order ID";

/// One order, shaped as an Airtable record's `fields` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    #[serde(rename = "Shopify Order ID")]
    pub order_id: String,
    #[serde(rename = "Order Name")]
    pub order_name: String,
    #[serde(rename = "Created At")]
    pub created_at: String,
    #[serde(rename = "Financial Status")]
    pub financial_status: String,
    #[serde(rename = "Fulfillment Status")]
    pub fulfillment_status: String,
    #[serde(rename = "Customer Email")]
    pub customer_email: String,
    #[serde(rename = "Shipping Country")]
    pub shipping_country: String,
    #[serde(rename = "Tags")]
    pub tags: String,
    #[serde(rename = "Total Price")]
    pub total_price: Option<f64>,
    #[serde(rename = "Raw JSON")]
    pub raw_json: String,
}

impl OrderRecord {
    /// Extract a record from a parsed order payload.
    ///
    /// Missing or null fields become empty strings (or `None` for the price).
    /// `email` falls back to `customer.email` only when it is absent or null.
    pub fn from_payload(order: &Value) -> Self {
        let created_at = match text(order.get("created_at")) {
            Some(raw) if !raw.is_empty() => normalize_timestamp(&raw).unwrap_or_else(|| {
                warn!(created_at = %raw, "order_created_at_unparseable");
                String::new()
            }),
            _ => String::new(),
        };

        let customer_email = text(order.get("email"))
            .or_else(|| text(order.pointer("/customer/email")))
            .unwrap_or_default();

        OrderRecord {
            order_id: text(order.get("id")).unwrap_or_default(),
            order_name: text(order.get("name")).unwrap_or_default(),
            created_at,
            financial_status: text(order.get("financial_status")).unwrap_or_default(),
            fulfillment_status: text(order.get("fulfillment_status")).unwrap_or_default(),
            customer_email,
            shipping_country: text(order.pointer("/shipping_address/country")).unwrap_or_default(),
            tags: text(order.get("tags")).unwrap_or_default(),
            total_price: price(order.get("total_price")),
            raw_json: order.to_string(),
        }
    }

    /// Whether the payload carried a usable order identifier.
    pub fn has_order_id(&self) -> bool {
        !self.order_id.is_empty()
    }
}

/// Normalize a timestamp to UTC ISO-8601 with millisecond precision.
///
/// Accepts RFC 3339 (Shopify's format, e.g. `2024-03-01T10:15:00-05:00`) and
/// bare `YYYY-MM-DD` dates, which are taken as midnight UTC.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();

    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })?;

    Some(parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Render a JSON value as text. Null and absent values yield `None`.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Shopify sends money as decimal strings. Empty, zero, and unparseable
/// values yield `None`.
fn price(value: Option<&Value>) -> Option<f64> {
    let amount = match value? {
        Value::String(s) if !s.is_empty() => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64().filter(|n| *n != 0.0)?,
        _ => return None,
    };

    amount.is_finite().then_some(amount)
}
