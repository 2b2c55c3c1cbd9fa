//! AuthKit Gateway - session and wallet-linking HTTP service
//!
//! This is the main entry point for the gateway service.
//!
//! # Configuration
//!
//! - `LISTEN_ADDR` - bind address (default `0.0.0.0:8080`)
//! - `CORS_ORIGINS` - comma separated allowed origins (default `*`)
//! - `SIGN_IN_PATH` - redirect target for unauthenticated requests
//! - `DATA_DIR` - `RocksDB` directory (default `/data/authkit`)
//! - `AUTH_BASE_URL` - remote auth API base URL
//! - `SIGN_MESSAGE` - wallet challenge prefix (required)
//! - `SECURE_COOKIES` - set to `true` to mark cookies `Secure`
//!
//! # Dev Mode
//!
//! Build with `--features dev-mode` to replace the remote auth API with an
//! in-process one. Sign in with `dev@localhost` / `dev`.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(not(feature = "dev-mode"))]
use authkit_session::HttpAuthApiClient;
#[cfg(feature = "dev-mode")]
use authkit_session::MockAuthApiClient;
use authkit_gateway::{create_router, GatewayConfig, GatewayState};
use authkit_session::{AuthConfig, CookieConfig, SessionOrchestrator};
use authkit_store::RocksStore;
use authkit_wallet::{WalletAuthenticator, WalletConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,authkit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting AuthKit Gateway");

    // Load configuration from environment
    let gateway_config = GatewayConfig::from_env();
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/authkit".into());
    let auth_base_url =
        std::env::var("AUTH_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());
    let secure_cookies = std::env::var("SECURE_COOKIES").is_ok_and(|v| v == "true");
    let wallet_config = WalletConfig::from_env()?;

    tracing::info!(
        listen_addr = %gateway_config.listen_addr,
        data_dir = %data_dir,
        auth_base_url = %auth_base_url,
        secure_cookies,
        "Gateway configuration loaded"
    );

    let auth_config = AuthConfig {
        base_url: auth_base_url,
        cookies: CookieConfig {
            secure: secure_cookies,
            ..CookieConfig::default()
        },
        ..AuthConfig::default()
    };

    // Initialize RocksDB store
    tracing::info!(path = %data_dir, "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&data_dir)?);
    let wallet = Arc::new(WalletAuthenticator::new(store, wallet_config));

    // Initialize auth API client
    #[cfg(feature = "dev-mode")]
    let client = {
        tracing::warn!("DEV MODE ENABLED - using in-process auth API");
        Arc::new(dev_auth_api()?)
    };

    #[cfg(not(feature = "dev-mode"))]
    let client = Arc::new(HttpAuthApiClient::new(auth_config.clone())?);
    tracing::info!("Auth API client initialized");

    let sessions = Arc::new(SessionOrchestrator::new(client, &auth_config));

    let listen_addr = gateway_config.listen_addr.clone();
    let state = GatewayState::new(sessions, wallet, gateway_config);
    let app = create_router(state);

    // Start HTTP server
    tracing::info!(%listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// An auth API that knows one user, `dev`.
#[cfg(feature = "dev-mode")]
fn dev_auth_api() -> Result<MockAuthApiClient, authkit_core::IdError> {
    use authkit_core::{Token, TokenPair, User, UserId};
    use authkit_session::mock::token_expiring_in;
    use chrono::{Duration, Utc};

    let now = Utc::now();
    let tokens = TokenPair {
        access_token: Token::new(
            token_expiring_in(Duration::hours(8), "dev"),
            now + Duration::hours(8),
        ),
        refresh_token: Token::new(
            token_expiring_in(Duration::days(7), "dev"),
            now + Duration::days(7),
        ),
    };

    let mut user = User::new(UserId::new("dev")?);
    user.email = Some("dev@localhost".to_string());

    Ok(MockAuthApiClient::new()
        .with_credentials("dev@localhost", "dev", tokens.clone())
        .with_valid_token(&tokens.access_token.token)
        .with_user(&tokens.access_token.token, user)
        .with_refresh(&tokens.refresh_token.token, tokens.clone()))
}
