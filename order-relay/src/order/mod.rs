//! Order notification model.
//!
//! ```text
//! raw body → serde_json::Value → OrderRecord → Airtable fields
//! ```

pub mod record;

pub use record::{normalize_timestamp, OrderRecord, ORDER_ID_FIELD};
