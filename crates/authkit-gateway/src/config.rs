//! HTTP surface settings.

use std::time::Duration;

use serde::Deserialize;

/// Listener, CORS, limits, and the sign-in redirect target.
///
/// Deserializable with every field optional; missing fields take the
/// [`Default`] values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8080`.
    pub listen_addr: String,
    /// Allowed CORS origins. `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
    /// Per-request deadline, in seconds.
    pub request_timeout_seconds: u64,
    /// Path unauthenticated requests are redirected to.
    pub sign_in_path: String,
}

impl GatewayConfig {
    /// Build a config from `LISTEN_ADDR`, `CORS_ORIGINS` (comma separated)
    /// and `SIGN_IN_PATH`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(addr) = lookup("LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if let Some(path) = lookup("SIGN_IN_PATH") {
            config.sign_in_path = path;
        }
        config
    }

    /// The per-request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            cors_origins: vec!["*".to_string()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
            sign_in_path: "/sign-in".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.max_body_bytes, 64 * 1024);
        assert_eq!(config.sign_in_path, "/sign-in");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GatewayConfig =
            serde_json::from_str(r#"{ "sign_in_path": "/login" }"#).unwrap();
        assert_eq!(config.sign_in_path, "/login");
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
    }

    #[test]
    fn env_overrides() {
        let config = GatewayConfig::from_lookup(|key| match key {
            "LISTEN_ADDR" => Some("127.0.0.1:9000".to_string()),
            "CORS_ORIGINS" => Some("https://a.example, https://b.example,".to_string()),
            _ => None,
        });
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.sign_in_path, "/sign-in");
    }
}
