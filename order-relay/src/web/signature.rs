//! Shopify webhook signature verification.
//!
//! Shopify signs the raw request body with HMAC-SHA256 keyed by the app's
//! webhook secret and sends the base64 digest in `X-Shopify-Hmac-Sha256`.
//! Reference: https://shopify.dev/docs/apps/build/webhooks/subscribe/https#step-5-verify-the-webhook

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the base64 HMAC digest.
pub const SHOPIFY_HMAC_HEADER: &str = "X-Shopify-Hmac-Sha256";

/// Compute the base64-encoded HMAC-SHA256 of `body` keyed by `secret`.
///
/// Returns `None` only if the MAC cannot be keyed, which HMAC never rejects
/// in practice.
pub fn compute_shopify_hmac(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Verify a Shopify webhook signature.
///
/// # Arguments
///
/// * `secret` - The configured webhook secret, if any
/// * `body` - The raw request body exactly as received
/// * `header` - The `X-Shopify-Hmac-Sha256` header value, if present
///
/// # Returns
///
/// `true` only if both inputs are present and the header equals
/// `base64(HMAC-SHA256(secret, body))`. Every failure is `false`.
pub fn verify_shopify_hmac(secret: Option<&str>, body: &[u8], header: Option<&str>) -> bool {
    let (secret, header) = match (secret, header) {
        (Some(s), Some(h)) if !s.is_empty() && !h.is_empty() => (s, h),
        (secret, header) => {
            warn!(
                has_secret = secret.map(|s| !s.is_empty()).unwrap_or(false),
                has_header = header.map(|h| !h.is_empty()).unwrap_or(false),
                "shopify_signature_missing_fields"
            );
            return false;
        }
    };

    let expected = match compute_shopify_hmac(secret, body) {
        Some(digest) => digest,
        None => {
            warn!("shopify_signature_invalid_key");
            return false;
        }
    };

    if expected.len() != header.len() {
        warn!(
            expected_length = expected.len(),
            actual_length = header.len(),
            "shopify_signature_length_mismatch"
        );
        return false;
    }

    // Constant-time comparison to prevent timing attacks
    let valid = constant_time_compare(&expected, header);

    if !valid {
        warn!(body_length = body.len(), "shopify_signature_mismatch");
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Check if a usable webhook secret is configured.
pub fn is_signature_verification_enabled(secret: &Option<String>) -> bool {
    secret
        .as_ref()
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false)
}
