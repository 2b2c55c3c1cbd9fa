//! Core identifier types for authkit.
//!
//! This module provides strongly-typed identifiers for users and wallet addresses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum accepted length of a user identifier, in bytes.
pub const MAX_USER_ID_LEN: usize = 128;

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The identifier was empty.
    #[error("identifier is empty")]
    Empty,

    /// The identifier exceeds the maximum length.
    #[error("identifier too long: {got} bytes (max {max})")]
    TooLong {
        /// Maximum length.
        max: usize,
        /// Actual length.
        got: usize,
    },

    /// The string is not valid base58.
    #[error("invalid base58 encoding")]
    InvalidBase58,

    /// The decoded bytes have the wrong length.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        got: usize,
    },
}

/// An opaque user identifier issued by the remote auth API.
///
/// User IDs are whatever the backend uses as primary key (`"u1"`, a UUID, a
/// cuid, ...). They are only checked for being non-empty and bounded.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a `UserId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or longer than [`MAX_USER_ID_LEN`].
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdError::Empty);
        }
        if id.len() > MAX_USER_ID_LEN {
            return Err(IdError::TooLong {
                max: MAX_USER_ID_LEN,
                got: id.len(),
            });
        }
        Ok(Self(id))
    }

    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl AsRef<[u8]> for UserId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A 32-byte Solana wallet address (an Ed25519 public key), base58-encoded for display.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress([u8; 32]);

impl WalletAddress {
    /// Create a new `WalletAddress` from raw public key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a `WalletAddress` from a base58-encoded string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid base58 or does not decode to 32 bytes.
    pub fn from_base58(s: &str) -> Result<Self, IdError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| IdError::InvalidBase58)?;
        let got = bytes.len();
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| IdError::InvalidLength { expected: 32, got })?;
        Ok(Self(arr))
    }

    /// Return the underlying public key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the base58-encoded string representation.
    #[must_use]
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletAddress({})", self.to_base58())
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl FromStr for WalletAddress {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_base58(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.to_base58()
    }
}

impl AsRef<[u8]> for WalletAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_empty() {
        assert_eq!(UserId::new(""), Err(IdError::Empty));
    }

    #[test]
    fn user_id_rejects_oversized() {
        let long = "x".repeat(MAX_USER_ID_LEN + 1);
        assert!(matches!(
            UserId::new(long),
            Err(IdError::TooLong { max: MAX_USER_ID_LEN, .. })
        ));
    }

    #[test]
    fn user_id_serde_is_transparent() {
        let id = UserId::new("u1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"u1\"");

        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);

        assert!(serde_json::from_str::<UserId>("\"\"").is_err());
    }

    #[test]
    fn wallet_address_base58_roundtrip() {
        let address = WalletAddress::from_bytes([7u8; 32]);
        let encoded = address.to_base58();
        let parsed: WalletAddress = encoded.parse().unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn wallet_address_system_program() {
        let address = WalletAddress::from_base58("11111111111111111111111111111111").unwrap();
        assert_eq!(address.as_bytes(), &[0u8; 32]);
    }

    #[test]
    fn wallet_address_invalid_base58() {
        // '0', 'O', 'I' and 'l' are not in the base58 alphabet
        assert_eq!(
            WalletAddress::from_base58("0OIl"),
            Err(IdError::InvalidBase58)
        );
    }

    #[test]
    fn wallet_address_wrong_length() {
        let short = bs58::encode([1u8; 16]).into_string();
        assert_eq!(
            WalletAddress::from_base58(&short),
            Err(IdError::InvalidLength {
                expected: 32,
                got: 16
            })
        );
    }
}
