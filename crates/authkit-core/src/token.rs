//! Bearer token values.
//!
//! A [`TokenPair`] is only ever minted by the remote auth API on sign-in or
//! refresh. It has no identity of its own; callers persist it as cookies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bearer token together with its absolute expiry.
///
/// Serialized as `{ "token": "...", "expiresAt": <epoch millis> }`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// The raw token string.
    pub token: String,
    /// When the token expires.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Create a new token.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Return the expiry as milliseconds since the Unix epoch.
    #[must_use]
    pub fn expires_at_millis(&self) -> i64 {
        self.expires_at.timestamp_millis()
    }
}

// Keep token material out of logs.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// An access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived credential used to authorize API calls.
    pub access_token: Token,
    /// Longer-lived credential exchanged for a new pair.
    pub refresh_token: Token,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_pair_wire_format() {
        let expires_at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let pair = TokenPair {
            access_token: Token::new("at", expires_at),
            refresh_token: Token::new("rt", expires_at),
        };

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["accessToken"]["token"], "at");
        assert_eq!(json["accessToken"]["expiresAt"], 1_700_000_000_123_i64);
        assert_eq!(json["refreshToken"]["token"], "rt");

        let parsed: TokenPair = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, pair);
    }

    #[test]
    fn debug_redacts_token() {
        let token = Token::new("secret-value", Utc::now());
        let debug = format!("{token:?}");
        assert!(!debug.contains("secret-value"));
        assert!(debug.contains("redacted"));
    }
}
