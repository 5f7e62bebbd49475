//! HTTP endpoint handlers.
//!
//! The order webhook answers 401 for bad signatures and 400 for bodies that
//! are not JSON. Every later failure is logged and answered with 200 so
//! Shopify does not keep redelivering a payload that will never succeed.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::airtable::{AirtableClient, AirtableError};
use crate::order::OrderRecord;
use crate::web::signature::{verify_shopify_hmac, SHOPIFY_HMAC_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub airtable: AirtableClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let airtable = AirtableClient::new(&config);
        Self {
            config: Arc::new(config),
            airtable,
        }
    }
}

// =============================================================================
// Liveness
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Root liveness check.
pub async fn root() -> &'static str {
    "Webhook server is running"
}

pub async fn ping() -> &'static str {
    "pong"
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Shopify Orders Webhook
// =============================================================================

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl WebhookResponse {
    fn with_status(status: &'static str) -> Json<Self> {
        Json(Self {
            status,
            order_id: None,
        })
    }
}

/// Shopify `orders/*` webhook endpoint.
///
/// This endpoint:
/// 1. Verifies the HMAC signature over the raw body
/// 2. Parses the body and extracts an [`OrderRecord`]
/// 3. Upserts the record into Airtable
pub async fn shopify_orders_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let hmac_header = headers
        .get(SHOPIFY_HMAC_HEADER)
        .and_then(|v| v.to_str().ok());

    info!(
        body_length = body.len(),
        has_signature = hmac_header.is_some(),
        topic = headers
            .get("X-Shopify-Topic")
            .and_then(|v| v.to_str().ok())
            .unwrap_or(""),
        "shopify_webhook_received"
    );

    if !verify_shopify_hmac(
        state.config.shopify_webhook_secret.as_deref(),
        &body,
        hmac_header,
    ) {
        warn!("shopify_signature_invalid");
        return (
            StatusCode::UNAUTHORIZED,
            WebhookResponse::with_status("unauthorized"),
        );
    }

    let order: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "shopify_payload_parse_failed");
            return (StatusCode::BAD_REQUEST, WebhookResponse::with_status("bad_json"));
        }
    };

    let record = OrderRecord::from_payload(&order);

    if !record.has_order_id() {
        error!("shopify_order_missing_id");
        return (
            StatusCode::OK,
            WebhookResponse::with_status("missing_id_ignored"),
        );
    }

    match state.airtable.upsert_order(&record).await {
        Ok(()) => {
            info!(order_id = %record.order_id, "shopify_order_upserted");
            (
                StatusCode::OK,
                Json(WebhookResponse {
                    status: "ok",
                    order_id: Some(record.order_id),
                }),
            )
        }
        Err(AirtableError::Rejected { status, body }) => {
            error!(
                order_id = %record.order_id,
                status_code = status,
                body = %body,
                "shopify_order_upsert_rejected"
            );
            (
                StatusCode::OK,
                WebhookResponse::with_status("upstream_error_logged"),
            )
        }
        Err(e) => {
            error!(
                order_id = %record.order_id,
                error = %e,
                "shopify_order_upsert_failed"
            );
            (
                StatusCode::OK,
                WebhookResponse::with_status("upstream_request_failed"),
            )
        }
    }
}
