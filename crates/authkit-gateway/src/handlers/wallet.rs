//! Wallet linking endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use authkit_core::WalletAddress;
use authkit_session::AuthApiClient;
use authkit_store::UserStore;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Response carrying a challenge to sign.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeResponse {
    /// The exact text the wallet must sign.
    pub message: String,
}

/// Request to verify a signed challenge.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// Base58 wallet address.
    pub address: String,
    /// Base58 detached signature, or a base58/base64 signed transaction.
    pub signature: String,
}

/// Response for a verified wallet.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Always `true`; failures are error responses.
    pub verified: bool,
    /// The linked address.
    pub address: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Issue a wallet challenge for the signed-in user.
///
/// # Errors
///
/// Returns an error if the nonce cannot be stored.
pub async fn challenge<A, S>(
    State(state): State<Arc<GatewayState<A, S>>>,
    user: AuthUser,
) -> Result<Json<ChallengeResponse>, ApiError>
where
    A: AuthApiClient + 'static,
    S: UserStore + 'static,
{
    let message = state.wallet.issue_challenge(user.id()).await?;
    Ok(Json(ChallengeResponse { message }))
}

/// Verify a signed challenge and link the wallet.
///
/// # Errors
///
/// Returns `400` for an unparseable address or proof, or when no challenge
/// is outstanding, and `401` when the proof does not verify.
pub async fn verify<A, S>(
    State(state): State<Arc<GatewayState<A, S>>>,
    user: AuthUser,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError>
where
    A: AuthApiClient + 'static,
    S: UserStore + 'static,
{
    let address = WalletAddress::from_base58(&request.address)?;

    state
        .wallet
        .link_wallet(user.id(), &address, &request.signature)
        .await?;

    Ok(Json(VerifyResponse {
        verified: true,
        address: address.to_base58(),
    }))
}
