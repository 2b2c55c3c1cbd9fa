//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use authkit_session::AuthApiClient;
use authkit_store::UserStore;

use crate::auth::require_session;
use crate::handlers::{health, session, wallet};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `GET /v1/session` - Current session summary
/// - `POST /v1/auth/sign-in` - Email/password sign-in
/// - `POST /v1/auth/refresh` - Exchange the refresh cookie
/// - `POST /v1/auth/sign-out` - Clear session cookies
///
/// ## Session required (redirects to sign-in otherwise)
/// - `GET /v1/me` - The signed-in user
/// - `POST /v1/wallet/challenge` - Issue a wallet challenge
/// - `POST /v1/wallet/verify` - Verify a signed challenge and link the wallet
pub fn create_router<A, S>(state: GatewayState<A, S>) -> Router
where
    A: AuthApiClient + 'static,
    S: UserStore + 'static,
{
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    let state = Arc::new(state);

    let protected = Router::new()
        .route("/v1/me", get(session::me))
        .route("/v1/wallet/challenge", post(wallet::challenge::<A, S>))
        .route("/v1/wallet/verify", post(wallet::verify::<A, S>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_session::<A, S>,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/v1/session", get(session::get_session::<A, S>))
        .route("/v1/auth/sign-in", post(session::sign_in::<A, S>))
        .route("/v1/auth/refresh", post(session::refresh::<A, S>))
        .route("/v1/auth/sign-out", post(session::sign_out::<A, S>))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
