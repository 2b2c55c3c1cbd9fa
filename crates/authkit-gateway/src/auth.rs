//! Session middleware and extractors.
//!
//! [`require_session`] runs the session orchestrator on every protected
//! request. Authenticated requests continue with an [`AuthUser`] in their
//! extensions and any renewed cookies appended to the response. Everything
//! else is redirected to sign-in with both cookies cleared.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use authkit_core::{User, UserId};
use authkit_session::{sign_in_redirect, AuthApiClient, SessionHeaders};
use authkit_store::UserStore;

use crate::error::ApiError;
use crate::state::GatewayState;

/// The user of an authenticated request.
///
/// Only available on routes behind [`require_session`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user returned by the auth API.
    pub user: User,
}

impl AuthUser {
    /// The user's ID.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.user.id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

/// Collect the request's `Cookie` header values.
pub(crate) fn cookie_headers(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(ToString::to_string)
        .collect()
}

/// Append an outcome's cookie mutations to a response.
pub(crate) fn apply_session_headers(response: &mut Response, session: &SessionHeaders) {
    for value in session.set_cookie_values() {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Unencodable Set-Cookie value"),
        }
    }
}

/// Middleware that admits only authenticated requests.
pub async fn require_session<A, S>(
    State(state): State<Arc<GatewayState<A, S>>>,
    mut request: Request,
    next: Next,
) -> Response
where
    A: AuthApiClient + 'static,
    S: UserStore + 'static,
{
    let cookies = cookie_headers(request.headers());
    let outcome = state.sessions.auth(cookies).await;
    let status = outcome.status();

    let (user, session_headers) = outcome.into_parts();
    if let Some(user) = user {
        request.extensions_mut().insert(AuthUser { user });
        let mut response = next.run(request).await;
        apply_session_headers(&mut response, &session_headers);
        return response;
    }

    let requested = request
        .uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str());
    let location = sign_in_redirect(&state.config.sign_in_path, requested);
    tracing::debug!(%status, %location, "Redirecting unauthenticated request");

    let mut response = Redirect::to(&location).into_response();
    apply_session_headers(&mut response, &session_headers);
    response
}
