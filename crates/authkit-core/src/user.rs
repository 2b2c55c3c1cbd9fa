//! The authenticated user profile.

use serde::{Deserialize, Serialize};

use crate::ids::{UserId, WalletAddress};

/// A user profile as returned by the remote `me` endpoint.
///
/// Only `id` is required; the remaining fields are carried through when the
/// backend provides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,
    /// Email address, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Linked wallet address, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<WalletAddress>,
}

impl User {
    /// Create a user with only an identifier.
    #[must_use]
    pub const fn new(id: UserId) -> Self {
        Self {
            id,
            email: None,
            name: None,
            wallet_address: None,
        }
    }
}
