//! Errors returned by gateway handlers.
//!
//! Every error response has the body `{ "error": { "code", "message" } }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use authkit_core::IdError;
use authkit_wallet::{AuthFailure, AuthFailureKind, WalletError};

/// A handler failure, rendered as a JSON error response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No authenticated session.
    #[error("unauthorized")]
    Unauthorized,

    /// A wallet proof did not verify.
    #[error("signature verification failed")]
    InvalidSignature,

    /// A wallet proof was submitted without an outstanding challenge.
    #[error("no wallet challenge issued")]
    ChallengeRequired,

    /// The request could not be understood.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Storage or other server-side failure. Details are logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct Envelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Response status.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::ChallengeRequired | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code placed in the body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::InvalidSignature => "invalid_signature",
            Self::ChallengeRequired => "challenge_required",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<AuthFailure> for ApiError {
    fn from(failure: AuthFailure) -> Self {
        match failure.kind {
            AuthFailureKind::InvalidSignature => Self::InvalidSignature,
            AuthFailureKind::UserNotFound => Self::ChallengeRequired,
            AuthFailureKind::MalformedTransaction => Self::BadRequest(failure.message),
        }
    }
}

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Auth(failure) => Self::from(failure),
            WalletError::Store(store_err) => {
                tracing::error!(error = %store_err, "Wallet store failure");
                Self::Internal("storage error".to_string())
            }
        }
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authkit_store::StoreError;

    #[test]
    fn error_status_codes() {
        assert_eq!(
            ApiError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::ChallengeRequired.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn wallet_failures_map_to_codes() {
        let err = ApiError::from(WalletError::from(AuthFailure::invalid_signature()));
        assert_eq!(err.code(), "invalid_signature");

        let err = ApiError::from(WalletError::from(AuthFailure::user_not_found()));
        assert_eq!(err.code(), "challenge_required");

        let err = ApiError::from(WalletError::from(AuthFailure::malformed_transaction(
            "invalid transaction: unexpected end of input",
        )));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(WalletError::from(StoreError::MissingColumnFamily("users")));
        assert_eq!(err.to_string(), "internal error: storage error");
    }
}
