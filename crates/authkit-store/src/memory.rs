//! In-memory `UserStore` for tests and dev mode.

use std::collections::HashMap;

use async_trait::async_trait;
use authkit_core::{UserId, WalletAddress};
use parking_lot::RwLock;

use crate::error::Result;
use crate::types::UserRecord;
use crate::UserStore;

/// A `UserStore` backed by hash maps.
#[derive(Default)]
pub struct MemoryStore {
    nonces: RwLock<HashMap<UserId, String>>,
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_nonce(&self, user_id: &UserId) -> Result<Option<String>> {
        Ok(self.nonces.read().get(user_id).cloned())
    }

    async fn set_nonce(&self, user_id: &UserId, nonce: &str) -> Result<()> {
        self.nonces.write().insert(user_id.clone(), nonce.to_string());
        Ok(())
    }

    async fn take_nonce_if(&self, user_id: &UserId, expected: &str) -> Result<bool> {
        let mut nonces = self.nonces.write();
        if nonces.get(user_id).map(String::as_str) != Some(expected) {
            return Ok(false);
        }
        nonces.remove(user_id);
        Ok(true)
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserRecord>> {
        Ok(self.users.read().get(user_id).cloned())
    }

    async fn set_wallet_address(&self, user_id: &UserId, address: &WalletAddress) -> Result<()> {
        self.users
            .write()
            .entry(user_id.clone())
            .or_insert_with(|| UserRecord::new(user_id.clone()))
            .link_wallet(*address);
        Ok(())
    }
}
