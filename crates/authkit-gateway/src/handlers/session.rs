//! Session endpoints.
//!
//! Each handler runs one orchestrator operation, replies with the outcome
//! summary, and applies the outcome's cookie mutations to the response.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use authkit_core::User;
use authkit_session::{AuthApiClient, SessionOutcome, SessionStatus, SignInRequest};
use authkit_store::UserStore;

use crate::auth::{apply_session_headers, cookie_headers, AuthUser};
use crate::state::GatewayState;

/// HTTP status for an outcome returned by an explicit sign-in or refresh.
const fn status_for(status: SessionStatus) -> StatusCode {
    match status {
        SessionStatus::LoggedIn | SessionStatus::Refreshed => StatusCode::OK,
        SessionStatus::NotLogin | SessionStatus::Invalid => StatusCode::UNAUTHORIZED,
        SessionStatus::Error => StatusCode::BAD_GATEWAY,
    }
}

fn outcome_response(outcome: &SessionOutcome, status: StatusCode) -> Response {
    let mut response = (status, Json(outcome.summary())).into_response();
    apply_session_headers(&mut response, outcome.headers());
    response
}

/// Report the current session.
///
/// Always `200 OK`; the body's `status` says whether the caller is signed in.
pub async fn get_session<A, S>(
    State(state): State<Arc<GatewayState<A, S>>>,
    headers: HeaderMap,
) -> Response
where
    A: AuthApiClient + 'static,
    S: UserStore + 'static,
{
    let outcome = state.sessions.auth(cookie_headers(&headers)).await;
    outcome_response(&outcome, StatusCode::OK)
}

/// Sign in with email and password.
pub async fn sign_in<A, S>(
    State(state): State<Arc<GatewayState<A, S>>>,
    Json(request): Json<SignInRequest>,
) -> Response
where
    A: AuthApiClient + 'static,
    S: UserStore + 'static,
{
    let outcome = state.sessions.sign_in(&request).await;
    outcome_response(&outcome, status_for(outcome.status()))
}

/// Exchange the refresh cookie for a new token pair.
pub async fn refresh<A, S>(
    State(state): State<Arc<GatewayState<A, S>>>,
    headers: HeaderMap,
) -> Response
where
    A: AuthApiClient + 'static,
    S: UserStore + 'static,
{
    let cookies = state.sessions.cookie_jar().read(cookie_headers(&headers));
    let outcome = state
        .sessions
        .refresh(cookies.refresh_token.as_deref())
        .await;
    outcome_response(&outcome, status_for(outcome.status()))
}

/// Clear both session cookies.
pub async fn sign_out<A, S>(State(state): State<Arc<GatewayState<A, S>>>) -> Response
where
    A: AuthApiClient + 'static,
    S: UserStore + 'static,
{
    let outcome = state.sessions.sign_out();
    let mut response = StatusCode::NO_CONTENT.into_response();
    apply_session_headers(&mut response, outcome.headers());
    response
}

/// The signed-in user.
pub async fn me(user: AuthUser) -> Json<User> {
    Json(user.user)
}
