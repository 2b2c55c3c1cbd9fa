//! Local structural decoding of bearer tokens.
//!
//! Decoding here never checks signatures; cryptographic validity is the remote
//! `verify` call's job. This module only answers "is this a well-formed JWT and
//! when does it expire", which lets the orchestrator skip network round trips
//! for garbage input and decide when to renew.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};

/// How long before expiry a token is renewed, in seconds.
pub const NEAR_EXPIRY_THRESHOLD_SECS: i64 = 5 * 60;

/// Claims extracted from a structurally valid token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecodedToken {
    /// Expiration timestamp, in seconds since the Unix epoch.
    pub exp: i64,
    /// All remaining claims.
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl DecodedToken {
    /// The expiry as a timestamp, or `None` if `exp` is out of range.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// The `sub` claim, if present and a string.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.claims.get("sub").and_then(Value::as_str)
    }
}

/// Decode a JWT without verifying its signature.
///
/// Returns `None` for any parse failure: wrong segment count, invalid base64,
/// invalid JSON, unknown `alg`, or a missing/non-numeric `exp`.
#[must_use]
pub fn decode_token(raw: &str) -> Option<DecodedToken> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    match decode::<DecodedToken>(raw, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            tracing::trace!(error = %e, "Token failed structural decode");
            None
        }
    }
}

/// Returns `true` when `expires_at - now <= threshold`.
///
/// Already-expired tokens count as near expiry.
#[must_use]
pub fn is_near_expiry(expires_at: DateTime<Utc>, now: DateTime<Utc>, threshold: Duration) -> bool {
    expires_at - now <= threshold
}
