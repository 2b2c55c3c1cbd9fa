//! Gateway application state.

use std::sync::Arc;

use authkit_session::{AuthApiClient, SessionOrchestrator};
use authkit_store::UserStore;
use authkit_wallet::WalletAuthenticator;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
pub struct GatewayState<A, S>
where
    A: AuthApiClient,
    S: UserStore,
{
    /// Session state machine.
    pub sessions: Arc<SessionOrchestrator<A>>,
    /// Wallet challenge/response.
    pub wallet: Arc<WalletAuthenticator<S>>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<A, S> GatewayState<A, S>
where
    A: AuthApiClient,
    S: UserStore,
{
    /// Create a new gateway state.
    #[must_use]
    pub const fn new(
        sessions: Arc<SessionOrchestrator<A>>,
        wallet: Arc<WalletAuthenticator<S>>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            sessions,
            wallet,
            config,
        }
    }
}

impl<A, S> Clone for GatewayState<A, S>
where
    A: AuthApiClient,
    S: UserStore,
{
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            wallet: Arc::clone(&self.wallet),
            config: self.config.clone(),
        }
    }
}
