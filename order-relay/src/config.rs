//! Configuration module for environment variable parsing.
//!
//! Every setting comes from the process environment. Missing Airtable
//! settings are tolerated at load time and reported by [`Config::missing_values`].

use std::env;

/// Default Airtable REST API root.
pub const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shopify shared secret for HMAC signature verification
    pub shopify_webhook_secret: Option<String>,

    /// Airtable API root, overridable for testing against a fake store
    pub airtable_api_url: String,

    /// Airtable base identifier (appXXXXXXXXXXXXXX)
    pub airtable_base_id: String,

    /// Name of the table orders are upserted into
    pub airtable_orders_table: String,

    /// Airtable personal access token
    pub airtable_token: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),

            shopify_webhook_secret: env::var("SHOPIFY_WEBHOOK_SECRET").ok(),

            airtable_api_url: env::var("AIRTABLE_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AIRTABLE_API_URL.to_string()),

            airtable_base_id: env_or_empty("AIRTABLE_BASE_ID"),

            airtable_orders_table: env_or_empty("AIRTABLE_ORDERS_TABLE"),

            airtable_token: env_or_empty("AIRTABLE_TOKEN"),
        }
    }

    /// Names of required Airtable variables that are unset or blank.
    pub fn missing_values(&self) -> Vec<&'static str> {
        [
            ("AIRTABLE_BASE_ID", &self.airtable_base_id),
            ("AIRTABLE_ORDERS_TABLE", &self.airtable_orders_table),
            ("AIRTABLE_TOKEN", &self.airtable_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

fn env_or_empty(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            port: 3000,
            shopify_webhook_secret: Some("secret".to_string()),
            airtable_api_url: DEFAULT_AIRTABLE_API_URL.to_string(),
            airtable_base_id: "appBase".to_string(),
            airtable_orders_table: "Orders".to_string(),
            airtable_token: "token".to_string(),
        }
    }

    #[test]
    fn test_missing_values_none() {
        assert!(sample().missing_values().is_empty());
    }

    #[test]
    fn test_missing_values_reports_blank_settings() {
        let config = Config {
            airtable_base_id: "".to_string(),
            airtable_token: "   ".to_string(),
            ..sample()
        };
        assert_eq!(
            config.missing_values(),
            vec!["AIRTABLE_BASE_ID", "AIRTABLE_TOKEN"]
        );
    }

    #[test]
    fn test_env_or_empty() {
        env::set_var("ORDER_RELAY_TEST_VALUE", "tbl");
        assert_eq!(env_or_empty("ORDER_RELAY_TEST_VALUE"), "tbl");
        env::remove_var("ORDER_RELAY_TEST_VALUE");
        assert_eq!(env_or_empty("ORDER_RELAY_TEST_VALUE"), "");
    }
}
