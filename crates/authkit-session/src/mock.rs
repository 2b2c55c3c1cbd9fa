//! In-memory auth API for tests and local development.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use authkit_core::{TokenPair, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use parking_lot::Mutex;

use crate::client::{AuthApiClient, SignInRequest};
use crate::error::{AuthError, Result};

/// Mint an HS256 token with `sub = subject` expiring `ttl` from now.
///
/// The signing key is fixed; only the structure matters to local decoding.
#[must_use]
pub fn token_expiring_in(ttl: Duration, subject: &str) -> String {
    let claims = serde_json::json!({
        "sub": subject,
        "exp": (Utc::now() + ttl).timestamp(),
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"authkit-mock"),
    )
    .unwrap_or_default()
}

/// Number of calls made to each [`MockAuthApiClient`] operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `verify` calls.
    pub verify: usize,
    /// `refresh` calls.
    pub refresh: usize,
    /// `me` calls.
    pub me: usize,
    /// `sign_in` calls.
    pub sign_in: usize,
}

impl CallCounts {
    /// Total remote calls.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.verify + self.refresh + self.me + self.sign_in
    }
}

/// A scripted auth API.
///
/// Unknown access tokens verify as `false`, unknown refresh tokens and bad
/// credentials are rejected with 401, and unknown users resolve to `None`.
#[derive(Default)]
pub struct MockAuthApiClient {
    valid_tokens: HashSet<String>,
    users: HashMap<String, User>,
    refreshes: HashMap<String, TokenPair>,
    credentials: HashMap<(String, String), TokenPair>,
    fail_verify: bool,
    fail_me: bool,
    fail_sign_in: bool,
    calls: Mutex<CallCounts>,
}

impl MockAuthApiClient {
    /// Create an empty mock that knows no tokens or users.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` in `verify`.
    #[must_use]
    pub fn with_valid_token(mut self, token: &str) -> Self {
        self.valid_tokens.insert(token.to_string());
        self
    }

    /// Resolve `access_token` to `user` in `me`.
    #[must_use]
    pub fn with_user(mut self, access_token: &str, user: User) -> Self {
        self.users.insert(access_token.to_string(), user);
        self
    }

    /// Exchange `refresh_token` for `tokens`.
    #[must_use]
    pub fn with_refresh(mut self, refresh_token: &str, tokens: TokenPair) -> Self {
        self.refreshes.insert(refresh_token.to_string(), tokens);
        self
    }

    /// Issue `tokens` for the given email and password.
    #[must_use]
    pub fn with_credentials(mut self, email: &str, password: &str, tokens: TokenPair) -> Self {
        self.credentials
            .insert((email.to_string(), password.to_string()), tokens);
        self
    }

    /// Fail every `verify` call with a transport error.
    #[must_use]
    pub const fn with_verify_failure(mut self) -> Self {
        self.fail_verify = true;
        self
    }

    /// Fail every `me` call with a transport error.
    #[must_use]
    pub const fn with_me_failure(mut self) -> Self {
        self.fail_me = true;
        self
    }

    /// Fail every `sign_in` call with a transport error.
    #[must_use]
    pub const fn with_sign_in_failure(mut self) -> Self {
        self.fail_sign_in = true;
        self
    }

    /// Calls made so far.
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        *self.calls.lock()
    }

    fn unavailable() -> AuthError {
        AuthError::Transport("auth API unavailable".to_string())
    }

    fn unauthorized(message: &str) -> AuthError {
        AuthError::Api {
            status: 401,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl AuthApiClient for MockAuthApiClient {
    async fn verify(&self, token: &str) -> Result<bool> {
        self.calls.lock().verify += 1;
        if self.fail_verify {
            return Err(Self::unavailable());
        }
        Ok(self.valid_tokens.contains(token))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        self.calls.lock().refresh += 1;
        self.refreshes
            .get(refresh_token)
            .cloned()
            .ok_or_else(|| Self::unauthorized("invalid refresh token"))
    }

    async fn me(&self, access_token: &str) -> Result<Option<User>> {
        self.calls.lock().me += 1;
        if self.fail_me {
            return Err(Self::unavailable());
        }
        Ok(self.users.get(access_token).cloned())
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<TokenPair> {
        self.calls.lock().sign_in += 1;
        if self.fail_sign_in {
            return Err(Self::unavailable());
        }
        self.credentials
            .get(&(request.email.clone(), request.password.clone()))
            .cloned()
            .ok_or_else(|| Self::unauthorized("invalid credentials"))
    }
}
