//! Session outcomes.
//!
//! Every call into the orchestrator resolves to exactly one [`SessionOutcome`].
//! Each variant carries the complete set of cookie mutations for that state, so
//! callers apply `headers` and never touch the cookies themselves.

use std::fmt;

use authkit_core::{Token, TokenPair, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cookies::SessionHeaders;

/// The status tag of a [`SessionOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// The existing access token is valid.
    LoggedIn,
    /// A new token pair was issued.
    Refreshed,
    /// No usable session exists.
    NotLogin,
    /// The presented credentials are invalid.
    Invalid,
    /// The auth API could not be reached or answered unexpectedly.
    Error,
}

impl SessionStatus {
    /// The wire name of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoggedIn => "LoggedIn",
            Self::Refreshed => "Refreshed",
            Self::NotLogin => "NotLogin",
            Self::Invalid => "Invalid",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tokens backing an authenticated session.
///
/// A session validated from an access cookie alone has no refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    /// The access token.
    pub access_token: Token,
    /// The refresh token, if one was presented or issued.
    pub refresh_token: Option<Token>,
}

impl From<TokenPair> for SessionTokens {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: Some(pair.refresh_token),
        }
    }
}

/// The result of an authentication check.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The presented access token is valid and not near expiry.
    LoggedIn {
        /// The authenticated user.
        user: User,
        /// The tokens in use.
        tokens: SessionTokens,
        /// Cookie mutations (empty when existing cookies stay valid).
        headers: SessionHeaders,
    },
    /// A new token pair was issued.
    Refreshed {
        /// The authenticated user.
        user: User,
        /// The freshly issued tokens.
        tokens: TokenPair,
        /// Cookie mutations persisting `tokens`.
        headers: SessionHeaders,
    },
    /// No session: credentials absent or the account no longer exists.
    NotLogin {
        /// Cookie mutations clearing both tokens.
        headers: SessionHeaders,
    },
    /// The presented credentials were rejected.
    Invalid {
        /// Cookie mutations clearing both tokens.
        headers: SessionHeaders,
    },
    /// A remote call failed.
    Error {
        /// Cookie mutations clearing both tokens.
        headers: SessionHeaders,
    },
}

impl SessionOutcome {
    /// The status tag.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        match self {
            Self::LoggedIn { .. } => SessionStatus::LoggedIn,
            Self::Refreshed { .. } => SessionStatus::Refreshed,
            Self::NotLogin { .. } => SessionStatus::NotLogin,
            Self::Invalid { .. } => SessionStatus::Invalid,
            Self::Error { .. } => SessionStatus::Error,
        }
    }

    /// Returns `true` for `LoggedIn` and `Refreshed`.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::LoggedIn { .. } | Self::Refreshed { .. })
    }

    /// The authenticated user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::LoggedIn { user, .. } | Self::Refreshed { user, .. } => Some(user),
            Self::NotLogin { .. } | Self::Invalid { .. } | Self::Error { .. } => None,
        }
    }

    /// The cookie mutations to apply.
    #[must_use]
    pub const fn headers(&self) -> &SessionHeaders {
        match self {
            Self::LoggedIn { headers, .. }
            | Self::Refreshed { headers, .. }
            | Self::NotLogin { headers }
            | Self::Invalid { headers }
            | Self::Error { headers } => headers,
        }
    }

    /// Split into the authenticated user and the headers to apply.
    #[must_use]
    pub fn into_parts(self) -> (Option<User>, SessionHeaders) {
        match self {
            Self::LoggedIn { user, headers, .. } | Self::Refreshed { user, headers, .. } => {
                (Some(user), headers)
            }
            Self::NotLogin { headers } | Self::Invalid { headers } | Self::Error { headers } => {
                (None, headers)
            }
        }
    }

    /// A serializable view of the outcome.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let tokens = match self {
            Self::LoggedIn { tokens, .. } => Some(tokens.clone()),
            Self::Refreshed { tokens, .. } => Some(SessionTokens::from(tokens.clone())),
            Self::NotLogin { .. } | Self::Invalid { .. } | Self::Error { .. } => None,
        };

        SessionSummary {
            status: self.status(),
            user: self.user().cloned(),
            tokens,
        }
    }
}

/// Serializable `{ status, user, tokens }` view of a [`SessionOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// The outcome status.
    pub status: SessionStatus,
    /// The user, `null` unless authenticated.
    pub user: Option<User>,
    /// The tokens, `null` unless authenticated.
    pub tokens: Option<SessionTokens>,
}

impl SessionSummary {
    /// When the access token expires, if authenticated.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.tokens.as_ref().map(|t| t.access_token.expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::CookieJar;
    use authkit_core::UserId;

    #[test]
    fn not_login_summary_is_empty() {
        let outcome = SessionOutcome::NotLogin {
            headers: CookieJar::default().clear(),
        };

        let json = serde_json::to_value(outcome.summary()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "NotLogin", "user": null, "tokens": null })
        );
    }

    #[test]
    fn refreshed_accessors() {
        let expires_at = Utc::now() + chrono::Duration::hours(1);
        let tokens = TokenPair {
            access_token: Token::new("at", expires_at),
            refresh_token: Token::new("rt", expires_at),
        };
        let user = User::new(UserId::new("u1").unwrap());
        let outcome = SessionOutcome::Refreshed {
            user: user.clone(),
            headers: CookieJar::default().set(&tokens),
            tokens,
        };

        assert_eq!(outcome.status(), SessionStatus::Refreshed);
        assert!(outcome.is_authenticated());
        assert_eq!(outcome.user(), Some(&user));
        assert_eq!(outcome.headers().cookies().len(), 2);

        let summary = outcome.summary();
        assert_eq!(summary.expires_at(), Some(expires_at));
        assert_eq!(
            summary.tokens.unwrap().refresh_token.map(|t| t.token),
            Some("rt".to_string())
        );

        let (parts_user, headers) = outcome.into_parts();
        assert_eq!(parts_user, Some(user));
        assert!(!headers.is_empty());
    }

    #[test]
    fn status_display() {
        assert_eq!(SessionStatus::NotLogin.to_string(), "NotLogin");
        assert_eq!(SessionStatus::LoggedIn.as_str(), "LoggedIn");
    }
}
