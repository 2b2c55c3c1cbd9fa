//! The session state machine.
//!
//! [`SessionOrchestrator`] turns inbound token cookies plus remote auth API
//! answers into a [`SessionOutcome`]. It performs at most three sequential
//! remote calls per request (verify, then maybe refresh, then me), never
//! retries, and holds no state between calls.
//!
//! Every non-authenticated outcome clears both cookies.

use std::sync::Arc;

use authkit_core::{Token, TokenPair, User};
use chrono::{Duration, Utc};

use crate::client::{AuthApiClient, SignInRequest};
use crate::codec::{decode_token, is_near_expiry};
use crate::cookies::{CookieJar, SessionHeaders};
use crate::outcome::{SessionOutcome, SessionTokens};
use crate::AuthConfig;

/// Decides session state from token cookies.
pub struct SessionOrchestrator<A: AuthApiClient> {
    client: Arc<A>,
    jar: CookieJar,
    near_expiry_threshold: Duration,
}

impl<A: AuthApiClient> SessionOrchestrator<A> {
    /// Create an orchestrator over the given auth API client.
    #[must_use]
    pub fn new(client: Arc<A>, config: &AuthConfig) -> Self {
        Self {
            client,
            jar: CookieJar::new(config.cookies.clone()),
            near_expiry_threshold: config.near_expiry_threshold,
        }
    }

    /// The cookie jar used to read and write token cookies.
    #[must_use]
    pub const fn cookie_jar(&self) -> &CookieJar {
        &self.jar
    }

    /// Authenticate a request from its `Cookie` header values.
    pub async fn auth<I, S>(&self, cookie_headers: I) -> SessionOutcome
    where
        I: IntoIterator<Item = S> + Send,
        S: AsRef<str>,
    {
        let cookies = self.jar.read(cookie_headers);
        self.validate(
            cookies.access_token.as_deref(),
            cookies.refresh_token.as_deref(),
        )
        .await
    }

    /// Authenticate from already-parsed token values.
    pub async fn validate(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> SessionOutcome {
        let access_token = access_token.filter(|t| !t.is_empty());
        let refresh_token = refresh_token.filter(|t| !t.is_empty());

        let Some(access_token) = access_token else {
            if refresh_token.is_some() {
                return self.refresh(refresh_token).await;
            }
            tracing::debug!("No session cookies present");
            return self.not_login();
        };

        match self.client.verify(access_token).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("Access token rejected by auth API");
                return self.invalid();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Access token verification failed");
                return self.error();
            }
        }

        let Some(expires_at) = decode_token(access_token).and_then(|d| d.expires_at()) else {
            tracing::warn!("Verified access token failed local decode");
            return self.invalid();
        };

        if is_near_expiry(expires_at, Utc::now(), self.near_expiry_threshold) {
            if refresh_token.is_none() {
                tracing::warn!(%expires_at, "Access token near expiry without a refresh token");
                return self.invalid();
            }
            tracing::debug!(%expires_at, "Access token near expiry, refreshing");
            return self.refresh(refresh_token).await;
        }

        let user = match self.client.me(access_token).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::debug!("Access token valid but user no longer exists");
                return self.not_login();
            }
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed");
                return self.error();
            }
        };

        let refresh_token = refresh_token.and_then(|raw| {
            decode_token(raw)
                .and_then(|d| d.expires_at())
                .map(|exp| Token::new(raw, exp))
        });

        tracing::debug!(user_id = %user.id, "Session valid");

        SessionOutcome::LoggedIn {
            user,
            tokens: SessionTokens {
                access_token: Token::new(access_token, expires_at),
                refresh_token,
            },
            headers: SessionHeaders::passthrough(),
        }
    }

    /// Exchange a refresh token for a new session.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> SessionOutcome {
        let Some(refresh_token) = refresh_token.filter(|t| !t.is_empty()) else {
            tracing::debug!("No refresh token present");
            return self.not_login();
        };

        if decode_token(refresh_token).is_none() {
            tracing::warn!("Refresh token failed local decode");
            return self.invalid();
        }

        let tokens = match self.client.refresh(refresh_token).await {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                return self.error();
            }
        };

        match self.load_user(&tokens).await {
            Ok(Some(user)) => {
                tracing::info!(user_id = %user.id, "Session refreshed");
                let headers = self.jar.set(&tokens);
                SessionOutcome::Refreshed {
                    user,
                    tokens,
                    headers,
                }
            }
            Ok(None) => self.not_login(),
            Err(outcome) => outcome,
        }
    }

    /// Start a session with email and password.
    pub async fn sign_in(&self, request: &SignInRequest) -> SessionOutcome {
        let tokens = match self.client.sign_in(request).await {
            Ok(tokens) => tokens,
            Err(e) if e.is_rejection() => {
                tracing::info!(error = %e, "Sign-in rejected");
                return self.invalid();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in failed");
                return self.error();
            }
        };

        match self.load_user(&tokens).await {
            Ok(Some(user)) => {
                tracing::info!(user_id = %user.id, "User signed in");
                let headers = self.jar.set(&tokens);
                SessionOutcome::LoggedIn {
                    user,
                    tokens: tokens.into(),
                    headers,
                }
            }
            Ok(None) => self.not_login(),
            Err(outcome) => outcome,
        }
    }

    /// End the session on the client.
    #[must_use]
    pub fn sign_out(&self) -> SessionOutcome {
        self.not_login()
    }

    /// Fetch the user for freshly issued tokens. A failed lookup resolves to
    /// an `Error` outcome.
    async fn load_user(&self, tokens: &TokenPair) -> Result<Option<User>, SessionOutcome> {
        match self.client.me(&tokens.access_token.token).await {
            Ok(Some(user)) => Ok(Some(user)),
            Ok(None) => {
                tracing::debug!("Tokens issued but user no longer exists");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed");
                Err(self.error())
            }
        }
    }

    fn not_login(&self) -> SessionOutcome {
        SessionOutcome::NotLogin {
            headers: self.jar.clear(),
        }
    }

    fn invalid(&self) -> SessionOutcome {
        SessionOutcome::Invalid {
            headers: self.jar.clear(),
        }
    }

    fn error(&self) -> SessionOutcome {
        SessionOutcome::Error {
            headers: self.jar.clear(),
        }
    }
}
