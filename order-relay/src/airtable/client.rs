//! Airtable REST client for upserting order records.
//!
//! Uses the `performUpsert` form of the "update multiple records" endpoint,
//! so a repeated webhook for the same order updates the existing row.
//! Reference: https://airtable.com/developers/web/api/update-multiple-records

use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};
use url::Url;

use super::error::{AirtableError, Result};
use crate::order::{OrderRecord, ORDER_ID_FIELD};
use crate::Config;

/// Airtable client bound to one base and table.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct AirtableClient {
    http: Client,
    api_url: String,
    base_id: String,
    table: String,
    token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpsertRequest<'a> {
    perform_upsert: PerformUpsert,
    records: [UpsertRecord<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PerformUpsert {
    fields_to_merge_on: [&'static str; 1],
}

#[derive(Serialize)]
struct UpsertRecord<'a> {
    fields: &'a OrderRecord,
}

impl AirtableClient {
    /// Create a client from the Airtable settings in `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            api_url: config.airtable_api_url.clone(),
            base_id: config.airtable_base_id.clone(),
            table: config.airtable_orders_table.clone(),
            token: config.airtable_token.clone(),
        }
    }

    /// Build `{api_url}/{base_id}/{table}` with each segment percent-encoded.
    pub fn table_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| AirtableError::InvalidUrl(format!("{}: {}", self.api_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| AirtableError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .push(&self.base_id)
            .push(&self.table);

        Ok(url)
    }

    /// Insert or update one order, merging on the Shopify order ID column.
    pub async fn upsert_order(&self, record: &OrderRecord) -> Result<()> {
        let url = self.table_url()?;

        let payload = UpsertRequest {
            perform_upsert: PerformUpsert {
                fields_to_merge_on: [ORDER_ID_FIELD],
            },
            records: [UpsertRecord { fields: record }],
        };

        info!(
            order_id = %record.order_id,
            table = %self.table,
            "airtable_upsert_starting"
        );

        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                order_id = %record.order_id,
                status_code = status.as_u16(),
                body = %body,
                "airtable_upsert_rejected"
            );
            return Err(AirtableError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            order_id = %record.order_id,
            status_code = status.as_u16(),
            "airtable_upsert_complete"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::DEFAULT_AIRTABLE_API_URL;

    fn config(api_url: &str) -> Config {
        Config {
            port: 0,
            shopify_webhook_secret: None,
            airtable_api_url: api_url.to_string(),
            airtable_base_id: "appBase123".to_string(),
            airtable_orders_table: "Shopify Orders".to_string(),
            airtable_token: "pat-test".to_string(),
        }
    }

    fn record() -> OrderRecord {
        OrderRecord::from_payload(&json!({ "id": 1001, "name": "#1001", "total_price": "20.00" }))
    }

    #[test]
    fn test_table_url_default_api() {
        let client = AirtableClient::new(&config(DEFAULT_AIRTABLE_API_URL));
        assert_eq!(
            client.table_url().unwrap().as_str(),
            "https://api.airtable.com/v0/appBase123/Shopify%20Orders"
        );
    }

    #[test]
    fn test_table_url_trailing_slash() {
        let client = AirtableClient::new(&config("https://api.airtable.com/v0/"));
        assert_eq!(
            client.table_url().unwrap().as_str(),
            "https://api.airtable.com/v0/appBase123/Shopify%20Orders"
        );
    }

    #[test]
    fn test_table_url_encodes_slash_in_table_name() {
        let mut cfg = config(DEFAULT_AIRTABLE_API_URL);
        cfg.airtable_orders_table = "Orders/2024".to_string();
        let client = AirtableClient::new(&cfg);
        assert!(client.table_url().unwrap().as_str().ends_with("/appBase123/Orders%2F2024"));
    }

    #[test]
    fn test_table_url_invalid() {
        let client = AirtableClient::new(&config("not a url"));
        assert!(matches!(client.table_url(), Err(AirtableError::InvalidUrl(_))));

        let client = AirtableClient::new(&config("mailto:orders@example.com"));
        assert!(matches!(client.table_url(), Err(AirtableError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_upsert_sends_merge_request() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("PATCH"))
            .and(matchers::path("/appBase123/Shopify%20Orders"))
            .and(matchers::header("Authorization", "Bearer pat-test"))
            .and(matchers::body_partial_json(json!({
                "performUpsert": { "fieldsToMergeOn": ["Shopify Order ID"] },
                "records": [{ "fields": {
                    "Shopify Order ID": "1001",
                    "Order Name": "#1001",
                    "Total Price": 20.0
                } }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AirtableClient::new(&config(&server.uri()));
        client.upsert_order(&record()).await.unwrap();
    }

    #[tokio::test]
    async fn test_upsert_rejected_carries_body() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("PATCH"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_string(r#"{"error":{"type":"INVALID_VALUE_FOR_COLUMN"}}"#),
            )
            .mount(&server)
            .await;

        let client = AirtableClient::new(&config(&server.uri()));
        match client.upsert_order(&record()).await {
            Err(AirtableError::Rejected { status, body }) => {
                assert_eq!(status, 422);
                assert!(body.contains("INVALID_VALUE_FOR_COLUMN"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upsert_transport_failure() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = AirtableClient::new(&config(&format!("http://127.0.0.1:{}", port)));
        assert!(matches!(
            client.upsert_order(&record()).await,
            Err(AirtableError::Request(_))
        ));
    }
}
