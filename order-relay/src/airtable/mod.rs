//! Outbound Airtable integration.
//!
//! One request per webhook: a `PATCH` upsert keyed on the Shopify order ID.
//! There is no retry; failures are reported to the caller for logging.

pub mod client;
pub mod error;

pub use client::AirtableClient;
pub use error::AirtableError;
