//! Web server module for the Shopify order webhook.
//!
//! Routes:
//! - `GET /`, `GET /ping`, `GET /health`: liveness
//! - `POST /webhooks/shopify/orders`: signed order notifications

pub mod handlers;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{
    health, ping, root, shopify_orders_webhook, AppState, HealthResponse, WebhookResponse,
};
pub use signature::{
    compute_shopify_hmac, is_signature_verification_enabled, verify_shopify_hmac,
    SHOPIFY_HMAC_HEADER,
};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        .route("/health", get(health))
        .route("/webhooks/shopify/orders", post(shopify_orders_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
