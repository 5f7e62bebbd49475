//! Error types for Airtable requests.

use thiserror::Error;

/// Result type alias for Airtable operations.
pub type Result<T> = std::result::Result<T, AirtableError>;

#[derive(Debug, Error)]
pub enum AirtableError {
    /// The configured API URL cannot carry a table path.
    #[error("invalid Airtable API url: {0}")]
    InvalidUrl(String),

    /// The request never produced a response.
    #[error("airtable request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Airtable answered with a non-2xx status.
    #[error("airtable rejected upsert: HTTP {status}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, usually Airtable's JSON error object
        body: String,
    },
}
