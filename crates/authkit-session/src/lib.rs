//! Session token orchestration for authkit.
//!
//! This crate decides, per request, whether the caller holds a usable session
//! and what cookie changes the response must carry. It provides:
//!
//! - Local structural decoding of access/refresh tokens
//! - Cookie parsing and `Set-Cookie` construction
//! - A client for the remote auth API (verify, refresh, me, sign-in)
//! - The [`SessionOrchestrator`] state machine and its [`SessionOutcome`]s
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────────┐
//! │   Gateway        │────▶│  SessionOrchestrator │
//! │   (middleware)   │     └───┬──────────────┬───┘
//! └──────────────────┘         │              │
//!                     ┌────────▼───┐   ┌──────▼────────┐
//!                     │ CookieJar  │   │ AuthApiClient │
//!                     │ + codec    │   │ (trait)       │
//!                     └────────────┘   └──────┬────────┘
//!                                             │ HTTPS
//!                                     ┌───────▼────────┐
//!                                     │ Remote auth API│
//!                                     └────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use authkit_session::{AuthConfig, HttpAuthApiClient, SessionOrchestrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig {
//!     base_url: "https://auth.example.com".to_string(),
//!     ..AuthConfig::default()
//! };
//! let client = Arc::new(HttpAuthApiClient::new(config.clone())?);
//! let orchestrator = SessionOrchestrator::new(client, &config);
//!
//! // In a request handler:
//! let outcome = orchestrator.auth(["accessToken=eyJhbGciOi..."]).await;
//! for value in outcome.headers().set_cookie_values() {
//!     println!("Set-Cookie: {value}");
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod codec;
pub mod cookies;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod orchestrator;
pub mod outcome;
pub mod redirect;

pub use client::{AuthApiClient, HttpAuthApiClient, SignInRequest};
pub use codec::{decode_token, is_near_expiry, DecodedToken, NEAR_EXPIRY_THRESHOLD_SECS};
pub use cookies::{CookieConfig, CookieJar, SessionCookies, SessionHeaders};
pub use error::{AuthError, Result};
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockAuthApiClient;
pub use orchestrator::SessionOrchestrator;
pub use outcome::{SessionOutcome, SessionStatus, SessionSummary, SessionTokens};
pub use redirect::sign_in_redirect;

use std::time::Duration;

/// Configuration for the remote auth API and session cookies.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the auth API (e.g., `https://auth.example.com`).
    pub base_url: String,
    /// Access tokens expiring within this window are renewed.
    pub near_expiry_threshold: chrono::Duration,
    /// Timeout for each auth API request.
    pub request_timeout: Duration,
    /// Cookie naming and attributes.
    pub cookies: CookieConfig,
}

impl AuthConfig {
    /// Get the token verification endpoint URL.
    #[must_use]
    pub fn verify_url(&self) -> String {
        format!("{}/auth/verify", self.base_url)
    }

    /// Get the token refresh endpoint URL.
    #[must_use]
    pub fn refresh_url(&self) -> String {
        format!("{}/auth/refresh", self.base_url)
    }

    /// Get the current-user endpoint URL.
    #[must_use]
    pub fn me_url(&self) -> String {
        format!("{}/auth/me", self.base_url)
    }

    /// Get the email sign-in endpoint URL.
    #[must_use]
    pub fn sign_in_url(&self) -> String {
        format!("{}/auth/sign-in", self.base_url)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            near_expiry_threshold: chrono::Duration::seconds(NEAR_EXPIRY_THRESHOLD_SECS),
            request_timeout: Duration::from_secs(10),
            cookies: CookieConfig::default(),
        }
    }
}
