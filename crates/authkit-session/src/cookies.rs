//! Access/refresh token cookies.
//!
//! The [`CookieJar`] never touches a response itself. It parses inbound
//! `Cookie` headers and builds the `Set-Cookie` mutations that a framework
//! layer applies verbatim.

use authkit_core::{Token, TokenPair};
use cookie::{Cookie, SameSite};
use time::OffsetDateTime;

/// Cookie naming and attribute configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    /// Name of the access token cookie.
    pub access_cookie_name: String,
    /// Name of the refresh token cookie.
    pub refresh_cookie_name: String,
    /// Whether to mark cookies `Secure`.
    pub secure: bool,
    /// Cookie path.
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            access_cookie_name: "accessToken".to_string(),
            refresh_cookie_name: "refreshToken".to_string(),
            secure: false,
            path: "/".to_string(),
        }
    }
}

/// Token values read from a request. Empty cookie values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    /// The access token, if present.
    pub access_token: Option<String>,
    /// The refresh token, if present.
    pub refresh_token: Option<String>,
}

/// The complete set of `Set-Cookie` mutations for one outcome.
///
/// Empty means "leave client cookies as they are".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionHeaders {
    cookies: Vec<Cookie<'static>>,
}

impl SessionHeaders {
    /// No cookie changes.
    #[must_use]
    pub const fn passthrough() -> Self {
        Self {
            cookies: Vec::new(),
        }
    }

    /// The cookies to set, in order.
    #[must_use]
    pub fn cookies(&self) -> &[Cookie<'static>] {
        &self.cookies
    }

    /// Returns `true` if no cookie changes are required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Serialized `Set-Cookie` header values.
    #[must_use]
    pub fn set_cookie_values(&self) -> Vec<String> {
        self.cookies.iter().map(ToString::to_string).collect()
    }

    /// Returns `true` if these headers expire the named cookie.
    #[must_use]
    pub fn clears(&self, name: &str) -> bool {
        self.cookies.iter().any(|c| {
            c.name() == name && c.value().is_empty() && c.max_age() == Some(time::Duration::ZERO)
        })
    }
}

/// Reads and writes the access/refresh cookie pair.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    config: CookieConfig,
}

impl CookieJar {
    /// Create a jar with the given configuration.
    #[must_use]
    pub const fn new(config: CookieConfig) -> Self {
        Self { config }
    }

    /// The jar's configuration.
    #[must_use]
    pub const fn config(&self) -> &CookieConfig {
        &self.config
    }

    /// Extract the token cookies from inbound `Cookie` header values.
    ///
    /// Unparseable pairs are skipped. If a name repeats, the last value wins.
    #[must_use]
    pub fn read<I, S>(&self, cookie_headers: I) -> SessionCookies
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cookies = SessionCookies::default();

        for header in cookie_headers {
            for cookie in Cookie::split_parse(header.as_ref()).filter_map(Result::ok) {
                self.assign(&mut cookies, cookie.name(), cookie.value());
            }
        }

        cookies
    }

    /// Extract the token cookies from outbound `Set-Cookie` header values.
    ///
    /// Expired cookies (`Max-Age=0`) read as absent.
    #[must_use]
    pub fn read_set_cookies<I, S>(&self, set_cookie_headers: I) -> SessionCookies
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cookies = SessionCookies::default();

        for header in set_cookie_headers {
            let Ok(cookie) = Cookie::parse(header.as_ref()) else {
                continue;
            };
            if cookie.max_age() == Some(time::Duration::ZERO) {
                self.assign(&mut cookies, cookie.name(), "");
            } else {
                self.assign(&mut cookies, cookie.name(), cookie.value());
            }
        }

        cookies
    }

    /// Headers that persist a freshly issued token pair.
    #[must_use]
    pub fn set(&self, tokens: &TokenPair) -> SessionHeaders {
        SessionHeaders {
            cookies: vec![
                self.token_cookie(&self.config.access_cookie_name, &tokens.access_token),
                self.token_cookie(&self.config.refresh_cookie_name, &tokens.refresh_token),
            ],
        }
    }

    /// Headers that expire both token cookies.
    #[must_use]
    pub fn clear(&self) -> SessionHeaders {
        SessionHeaders {
            cookies: vec![
                self.removal_cookie(&self.config.access_cookie_name),
                self.removal_cookie(&self.config.refresh_cookie_name),
            ],
        }
    }

    fn assign(&self, cookies: &mut SessionCookies, name: &str, value: &str) {
        let value = (!value.is_empty()).then(|| value.to_string());
        if name == self.config.access_cookie_name {
            cookies.access_token = value;
        } else if name == self.config.refresh_cookie_name {
            cookies.refresh_token = value;
        }
    }

    fn token_cookie(&self, name: &str, token: &Token) -> Cookie<'static> {
        let mut cookie = Cookie::build((name.to_string(), token.token.clone()))
            .http_only(true)
            .secure(self.config.secure)
            .same_site(SameSite::Lax)
            .path(self.config.path.clone())
            .build();

        if let Ok(expires) = OffsetDateTime::from_unix_timestamp(token.expires_at.timestamp()) {
            cookie.set_expires(expires);
        }

        cookie
    }

    fn removal_cookie(&self, name: &str) -> Cookie<'static> {
        Cookie::build((name.to_string(), ""))
            .http_only(true)
            .secure(self.config.secure)
            .same_site(SameSite::Lax)
            .path(self.config.path.clone())
            .max_age(time::Duration::ZERO)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn pair() -> TokenPair {
        let expires_at = DateTime::from_timestamp(1_900_000_000, 0).unwrap();
        TokenPair {
            access_token: Token::new("access-1", expires_at),
            refresh_token: Token::new("refresh-1", expires_at + chrono::Duration::days(7)),
        }
    }

    #[test]
    fn reads_both_cookies() {
        let jar = CookieJar::default();
        let cookies = jar.read(["theme=dark; accessToken=at; refreshToken=rt"]);
        assert_eq!(cookies.access_token.as_deref(), Some("at"));
        assert_eq!(cookies.refresh_token.as_deref(), Some("rt"));
    }

    #[test]
    fn reads_across_multiple_headers() {
        let jar = CookieJar::default();
        let cookies = jar.read(["accessToken=at", "refreshToken=rt"]);
        assert_eq!(cookies.access_token.as_deref(), Some("at"));
        assert_eq!(cookies.refresh_token.as_deref(), Some("rt"));
    }

    #[test]
    fn empty_values_are_absent() {
        let jar = CookieJar::default();
        let cookies = jar.read(["accessToken=; refreshToken="]);
        assert_eq!(cookies, SessionCookies::default());
    }

    #[test]
    fn no_headers_is_empty() {
        let jar = CookieJar::default();
        assert_eq!(jar.read(Vec::<String>::new()), SessionCookies::default());
    }

    #[test]
    fn set_cookie_attributes() {
        let jar = CookieJar::default();
        let headers = jar.set(&pair());
        let values = headers.set_cookie_values();

        assert_eq!(values.len(), 2);
        let access = &values[0];
        assert!(access.starts_with("accessToken=access-1"));
        assert!(access.contains("HttpOnly"));
        assert!(access.contains("SameSite=Lax"));
        assert!(access.contains("Path=/"));
        assert!(access.contains("Expires="));
        assert!(!access.contains("Secure"));
        assert!(values[1].starts_with("refreshToken=refresh-1"));

        let expires = headers.cookies()[0].expires_datetime().unwrap();
        assert_eq!(expires.unix_timestamp(), 1_900_000_000);
        let expires = headers.cookies()[1].expires_datetime().unwrap();
        assert_eq!(expires.unix_timestamp(), 1_900_604_800);
    }

    #[test]
    fn secure_flag_is_configurable() {
        let jar = CookieJar::new(CookieConfig {
            secure: true,
            ..CookieConfig::default()
        });
        let values = jar.set(&pair()).set_cookie_values();
        assert!(values.iter().all(|v| v.contains("Secure")));
    }

    #[test]
    fn clear_expires_both() {
        let jar = CookieJar::default();
        let headers = jar.clear();

        assert!(headers.clears("accessToken"));
        assert!(headers.clears("refreshToken"));
        for value in headers.set_cookie_values() {
            assert!(value.contains("Max-Age=0"));
        }
    }

    #[test]
    fn set_cookies_read_back() {
        let jar = CookieJar::default();
        let tokens = pair();
        let values = jar.set(&tokens).set_cookie_values();

        let cookies = jar.read_set_cookies(&values);
        assert_eq!(cookies.access_token.as_deref(), Some("access-1"));
        assert_eq!(cookies.refresh_token.as_deref(), Some("refresh-1"));

        let cleared = jar.read_set_cookies(jar.clear().set_cookie_values());
        assert_eq!(cleared, SessionCookies::default());
    }

    #[test]
    fn custom_cookie_names() {
        let jar = CookieJar::new(CookieConfig {
            access_cookie_name: "at".to_string(),
            refresh_cookie_name: "rt".to_string(),
            ..CookieConfig::default()
        });
        let cookies = jar.read(["at=one; rt=two; accessToken=ignored"]);
        assert_eq!(cookies.access_token.as_deref(), Some("one"));
        assert_eq!(cookies.refresh_token.as_deref(), Some("two"));
        assert!(jar.clear().clears("at"));
    }

    #[test]
    fn passthrough_is_empty() {
        assert!(SessionHeaders::passthrough().is_empty());
        assert!(!SessionHeaders::passthrough().clears("accessToken"));
    }
}
