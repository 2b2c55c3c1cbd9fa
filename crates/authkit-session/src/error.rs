//! Remote auth API error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors returned by an [`AuthApiClient`](crate::AuthApiClient).
///
/// The orchestrator never surfaces these to callers; every variant collapses
/// into a terminal [`SessionOutcome`](crate::SessionOutcome).
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request never produced a response (connect failure, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// The auth API answered with a non-success status.
    #[error("auth API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, if any.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns `true` if a later attempt with the same input may succeed.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidResponse(_) | Self::Internal(_) => false,
        }
    }

    /// Returns `true` if the auth API rejected the presented credential.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { status: 400 | 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> AuthError {
        AuthError::Api {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn retriable_errors() {
        assert!(AuthError::Transport("timeout".into()).is_retriable());
        assert!(api(503).is_retriable());
        assert!(api(429).is_retriable());
        assert!(!api(401).is_retriable());
        assert!(!AuthError::InvalidResponse("bad json".into()).is_retriable());
    }

    #[test]
    fn rejection_errors() {
        assert!(api(401).is_rejection());
        assert!(api(403).is_rejection());
        assert!(api(400).is_rejection());
        assert!(!api(500).is_rejection());
        assert!(!AuthError::Transport("reset".into()).is_rejection());
    }
}
