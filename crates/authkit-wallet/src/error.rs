//! Wallet authentication error types.

use std::fmt;

use authkit_store::StoreError;
use thiserror::Error;

/// A result type using `WalletError`.
pub type Result<T> = std::result::Result<T, WalletError>;

/// The category of a failed wallet proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthFailureKind {
    /// The proof did not verify. Carries no detail about which check failed.
    InvalidSignature,
    /// No challenge is outstanding for the user.
    UserNotFound,
    /// The proof could not be decoded as a signature or a transaction.
    MalformedTransaction,
}

impl AuthFailureKind {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::MalformedTransaction => "MALFORMED_TRANSACTION",
        }
    }
}

impl fmt::Display for AuthFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A wallet proof was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct AuthFailure {
    /// What went wrong.
    pub kind: AuthFailureKind,
    /// Human-readable message, safe to show to the caller.
    pub message: String,
}

impl AuthFailure {
    /// The generic failure returned for any unverified proof.
    #[must_use]
    pub fn invalid_signature() -> Self {
        Self {
            kind: AuthFailureKind::InvalidSignature,
            message: "signature verification failed".to_string(),
        }
    }

    /// No outstanding challenge.
    #[must_use]
    pub fn user_not_found() -> Self {
        Self {
            kind: AuthFailureKind::UserNotFound,
            message: "no challenge issued for user".to_string(),
        }
    }

    /// Undecodable proof.
    #[must_use]
    pub fn malformed_transaction(message: impl Into<String>) -> Self {
        Self {
            kind: AuthFailureKind::MalformedTransaction,
            message: message.into(),
        }
    }
}

/// Errors returned by the wallet authenticator.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The proof was rejected.
    #[error(transparent)]
    Auth(#[from] AuthFailure),

    /// The nonce or user record could not be read or written.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl WalletError {
    /// The proof failure, if this is one.
    #[must_use]
    pub const fn auth_failure(&self) -> Option<&AuthFailure> {
        match self {
            Self::Auth(failure) => Some(failure),
            Self::Store(_) => None,
        }
    }
}

/// Startup configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
}
