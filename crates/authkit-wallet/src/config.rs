//! Wallet challenge configuration.

use crate::error::ConfigError;

/// Environment variable holding the challenge prefix.
pub const SIGN_MESSAGE_ENV: &str = "SIGN_MESSAGE";

/// Configuration for the wallet challenge protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Text prepended to every nonce to form the challenge the user signs.
    pub sign_message_prefix: String,
}

impl WalletConfig {
    /// Create a configuration with the given prefix.
    #[must_use]
    pub fn new(sign_message_prefix: impl Into<String>) -> Self {
        Self {
            sign_message_prefix: sign_message_prefix.into(),
        }
    }

    /// Load the prefix from `SIGN_MESSAGE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        lookup(SIGN_MESSAGE_ENV)
            .map(Self::new)
            .ok_or(ConfigError::MissingEnv(SIGN_MESSAGE_ENV))
    }

    /// The challenge text for a nonce.
    #[must_use]
    pub fn challenge(&self, nonce: &str) -> String {
        format!("{}{nonce}", self.sign_message_prefix)
    }
}
