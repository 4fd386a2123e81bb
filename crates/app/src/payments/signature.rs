//! Webhook signature verification.
//!
//! The provider signs each delivery with `t=<unix seconds>,v1=<hex hmac>` where the HMAC
//! is SHA-256 over `"{t}.{payload}"` keyed by the endpoint secret. Several `v1` entries
//! may be present while a secret is being rolled.

use std::time::Duration;

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha2::Sha256;
use thiserror::Error;

/// Default maximum age of a signed delivery.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

const TIMESTAMP_KEY: &str = "t";
const SIGNATURE_KEY: &str = "v1";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature header is malformed")]
    MalformedHeader,

    #[error("signature header has no timestamp")]
    MissingTimestamp,

    #[error("signature header has no v1 signatures")]
    MissingSignature,

    #[error("signature timestamp is outside the tolerance window")]
    Expired,

    #[error("no signature matches the payload")]
    Mismatch,

    #[error("webhook signing secret is unusable")]
    InvalidSecret,
}

/// Verify `header` against `payload` at time `now`.
///
/// # Errors
///
/// Returns a [`SignatureError`] describing why the delivery cannot be trusted.
pub fn verify(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance: Duration,
    now: Timestamp,
) -> Result<(), SignatureError> {
    let (timestamp, signatures) = parse_header(header)?;

    if now.as_second().abs_diff(timestamp) > tolerance.as_secs() {
        return Err(SignatureError::Expired);
    }

    let signed = signed_payload(timestamp, payload);

    let matched = signatures.iter().any(|signature| {
        let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
            return false;
        };

        mac.update(&signed);

        mac.verify_slice(signature).is_ok()
    });

    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Produce a header the way the provider would, for a given secret and time.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidSecret`] when the secret cannot key an HMAC.
pub fn sign(payload: &[u8], secret: &str, timestamp: Timestamp) -> Result<String, SignatureError> {
    let seconds = timestamp.as_second();

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_invalid_length| SignatureError::InvalidSecret)?;

    mac.update(&signed_payload(seconds, payload));

    Ok(format!(
        "{TIMESTAMP_KEY}={seconds},{SIGNATURE_KEY}={}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

fn signed_payload(timestamp: i64, payload: &[u8]) -> Vec<u8> {
    let mut signed = format!("{timestamp}.").into_bytes();
    signed.extend_from_slice(payload);
    signed
}

fn parse_header(header: &str) -> Result<(i64, Vec<Vec<u8>>), SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let (key, value) = part
            .trim()
            .split_once('=')
            .ok_or(SignatureError::MalformedHeader)?;

        match key {
            TIMESTAMP_KEY => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_not_a_number| SignatureError::MalformedHeader)?,
                );
            }
            SIGNATURE_KEY => {
                // Undecodable entries are ignored like unknown schemes.
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;

    if signatures.is_empty() {
        return Err(SignatureError::MissingSignature);
    }

    Ok((timestamp, signatures))
}
