//! Webhook Signature Verification
//!
//! The voice platform signs every webhook with the account API key. The
//! `x-retell-signature` header has the form `v=<unix millis>,d=<hex digest>`,
//! where the digest is HMAC-SHA256 over the raw body followed by the decimal
//! timestamp.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-retell-signature";

/// Signatures older (or newer) than this are rejected.
pub const MAX_CLOCK_SKEW_MS: u64 = 5 * 60 * 1000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Malformed signature header")]
    Malformed,
    #[error("Signature timestamp is outside the accepted window")]
    Expired,
    #[error("Signature does not match payload")]
    Mismatch,
    #[error("Invalid signing key")]
    InvalidKey,
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn mac_for(api_key: &str, body: &[u8], timestamp: u64) -> Result<HmacSha256, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(api_key.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(body);
    mac.update(timestamp.to_string().as_bytes());
    Ok(mac)
}

/// Produces a header value for `body`, as the platform would send it.
pub fn sign(body: &[u8], api_key: &str, timestamp: u64) -> Result<String, SignatureError> {
    let digest = mac_for(api_key, body, timestamp)?.finalize().into_bytes();
    Ok(format!("v={},d={}", timestamp, hex::encode(digest)))
}

fn parse_header(signature: &str) -> Result<(u64, &str), SignatureError> {
    let (version, digest) = signature
        .trim()
        .split_once(",d=")
        .ok_or(SignatureError::Malformed)?;
    let timestamp = version
        .strip_prefix("v=")
        .and_then(|ts| ts.parse::<u64>().ok())
        .ok_or(SignatureError::Malformed)?;
    Ok((timestamp, digest))
}

/// Verifies `signature` against `body` at the time `now_ms`.
pub fn verify_at(
    body: &[u8],
    api_key: &str,
    signature: &str,
    now_ms: u64,
) -> Result<(), SignatureError> {
    let (timestamp, digest) = parse_header(signature)?;
    if now_ms.abs_diff(timestamp) > MAX_CLOCK_SKEW_MS {
        return Err(SignatureError::Expired);
    }
    let expected = hex::decode(digest).map_err(|_| SignatureError::Malformed)?;
    mac_for(api_key, body, timestamp)?
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Verifies `signature` against `body` using the current clock.
pub fn verify(body: &[u8], api_key: &str, signature: &str) -> Result<(), SignatureError> {
    verify_at(body, api_key, signature, now_millis())
}
