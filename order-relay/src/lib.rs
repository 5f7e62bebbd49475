//! Order Relay - Shopify order webhooks into Airtable.
//!
//! The `order-relay` binary serves the routes in [`web`]. Each verified order
//! notification becomes one upsert against the configured Airtable table.
//!
//! ## Request Flow
//!
//! ```text
//! Shopify → POST /webhooks/shopify/orders → HMAC check → OrderRecord → Airtable upsert
//! ```

pub mod airtable;
pub mod config;
pub mod order;
pub mod web;

// Re-export commonly used types
pub use airtable::{AirtableClient, AirtableError};
pub use config::Config;
pub use order::OrderRecord;
pub use web::{router, AppState};
