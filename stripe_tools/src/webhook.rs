//! Webhook signature verification.
//!
//! Stripe signs every webhook call. The `Stripe-Signature` header carries a timestamp and one or more `v1`
//! signatures, each a hex HMAC-SHA256 of `"{timestamp}.{raw body}"` keyed with the endpoint's signing secret.
//! The raw body must be verified byte-for-byte, *before* any JSON parsing.
use chrono::Utc;
use log::*;

use crate::{
    error::SignatureError,
    helpers::{parse_signature_header, signature_matches},
    StripeApiError,
    StripeEvent,
};

/// Checks the signature header against the payload. `now` is a unix timestamp in seconds.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<(), SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::MissingSecret);
    }
    let header = parse_signature_header(header)?;
    if !header.signatures.iter().any(|sig| signature_matches(secret, header.timestamp, payload, sig)) {
        return Err(SignatureError::NoMatchingSignature);
    }
    if tolerance_secs > 0 && (now - header.timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutsideTolerance);
    }
    Ok(())
}

/// Verifies the payload and, if it is genuine, decodes it into a [`StripeEvent`].
pub fn construct_event(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
) -> Result<StripeEvent, StripeApiError> {
    verify_signature(payload, header, secret, tolerance_secs, Utc::now().timestamp()).map_err(|e| {
        warn!("💳️ Webhook signature check failed. {e}");
        e
    })?;
    let event = serde_json::from_slice::<StripeEvent>(payload).map_err(|e| StripeApiError::JsonError(e.to_string()))?;
    trace!("💳️ Verified webhook event {} ({})", event.id, event.event_type);
    Ok(event)
}
