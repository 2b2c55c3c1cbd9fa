//! Data types persisted by the storage layer.

use authkit_core::{UserId, WalletAddress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user record stored in the database.
///
/// Only the wallet link is kept locally; the profile itself lives behind the
/// remote auth API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier for the user.
    pub user_id: UserId,
    /// The wallet this user proved control of, if any.
    pub wallet_address: Option<WalletAddress>,
    /// When the wallet was linked.
    pub wallet_linked_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create an empty record for a user.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            wallet_address: None,
            wallet_linked_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Record a freshly linked wallet.
    pub fn link_wallet(&mut self, address: WalletAddress) {
        let now = Utc::now();
        self.wallet_address = Some(address);
        self.wallet_linked_at = Some(now);
        self.updated_at = now;
    }
}
