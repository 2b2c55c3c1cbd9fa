//! Remote auth API client.
//!
//! This module defines the [`AuthApiClient`] seam the orchestrator talks to and
//! an HTTP implementation for the standard auth API:
//!
//! - `POST  /auth/verify   { token }        -> { result: bool }`
//! - `PATCH /auth/refresh  { refreshToken } -> { result: { tokens } }`
//! - `GET   /auth/me       (bearer)         -> { result: User | null }`
//! - `POST  /auth/sign-in  { email, password } -> { result: { tokens } }`
//!
//! Retries and timeouts belong here, never in the orchestrator.

use async_trait::async_trait;
use authkit_core::{TokenPair, User};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};
use crate::AuthConfig;

/// Request payload for email/password sign-in.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    /// User's email address.
    pub email: String,
    /// User's password.
    pub password: String,
}

impl std::fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Remote operations the session orchestrator depends on.
#[async_trait]
pub trait AuthApiClient: Send + Sync {
    /// Ask the auth API whether an access token is valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails; an invalid token is `Ok(false)`.
    async fn verify(&self, token: &str) -> Result<bool>;

    /// Exchange a refresh token for a new token pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh is rejected or the call fails.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair>;

    /// Fetch the user an access token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails; an unknown user is `Ok(None)`.
    async fn me(&self, access_token: &str) -> Result<Option<User>>;

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the call fails.
    async fn sign_in(&self, request: &SignInRequest) -> Result<TokenPair>;
}

/// Standard `{ "result": ... }` response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: T,
}

/// Payload of the refresh and sign-in responses.
#[derive(Debug, Deserialize)]
struct TokensResult {
    tokens: TokenPair,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Error body returned by the auth API.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    message: Option<String>,
}

/// HTTP client for the remote auth API.
pub struct HttpAuthApiClient {
    config: AuthConfig,
    client: reqwest::Client,
}

impl HttpAuthApiClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Send a request and decode the `result` field of the envelope.
    async fn send<T>(&self, request: reqwest::RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.to_string());

            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        Ok(envelope.result)
    }
}

#[async_trait]
impl AuthApiClient for HttpAuthApiClient {
    async fn verify(&self, token: &str) -> Result<bool> {
        let request = self
            .client
            .post(self.config.verify_url())
            .json(&VerifyRequest { token });

        self.send(request).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let request = self
            .client
            .patch(self.config.refresh_url())
            .json(&RefreshRequest { refresh_token });

        let result: TokensResult = self.send(request).await?;
        Ok(result.tokens)
    }

    async fn me(&self, access_token: &str) -> Result<Option<User>> {
        let request = self
            .client
            .get(self.config.me_url())
            .bearer_auth(access_token);

        self.send(request).await
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<TokenPair> {
        let request = self.client.post(self.config.sign_in_url()).json(request);

        let result: TokensResult = self.send(request).await?;
        Ok(result.tokens)
    }
}
