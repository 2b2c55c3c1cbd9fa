//! HTTP gateway for authkit.
//!
//! This crate applies session outcomes to HTTP traffic. It handles:
//!
//! - Session middleware that renews tokens and redirects to sign-in
//! - Session, sign-in, refresh and sign-out endpoints
//! - Wallet challenge and verification endpoints
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Clients                            │
//! │                   (browser, cookie jar)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      authkit-gateway                        │
//! │  ┌──────────────┐ ┌─────────────┐ ┌─────────────────────┐   │
//! │  │   Session    │ │   Router    │ │   Wallet            │   │
//! │  │  Middleware  │ │  + Handlers │ │   Endpoints         │   │
//! │  └──────────────┘ └─────────────┘ └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┴──────────────┐
//!               ▼                             ▼
//!        ┌──────────────┐              ┌──────────────┐
//!        │ Remote auth  │              │   RocksDB    │
//!        │ API          │              │   store      │
//!        └──────────────┘              └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use authkit_gateway::{create_router, GatewayConfig, GatewayState};
//! use authkit_session::{AuthConfig, HttpAuthApiClient, SessionOrchestrator};
//! use authkit_store::RocksStore;
//! use authkit_wallet::{WalletAuthenticator, WalletConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth_config = AuthConfig::default();
//! let client = Arc::new(HttpAuthApiClient::new(auth_config.clone())?);
//! let sessions = Arc::new(SessionOrchestrator::new(client, &auth_config));
//!
//! let store = Arc::new(RocksStore::open("/tmp/authkit")?);
//! let wallet = Arc::new(WalletAuthenticator::new(store, WalletConfig::from_env()?));
//!
//! let state = GatewayState::new(sessions, wallet, GatewayConfig::default());
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{require_session, AuthUser};
pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;
