//! `RocksDB` storage layer for authkit.
//!
//! This crate persists the small amount of state the wallet linking flow needs:
//! the single outstanding challenge nonce per user and the wallet a user has
//! proven control of.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `users`: user records with the linked wallet, keyed by `user_id`
//! - `wallet_nonces`: the current challenge nonce, keyed by `user_id`
//!
//! # Example
//!
//! ```no_run
//! use authkit_core::UserId;
//! use authkit_store::{RocksStore, UserStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RocksStore::open("/tmp/authkit-db")?;
//!
//! let user_id = UserId::new("u1")?;
//! store.set_nonce(&user_id, "b5f1c2").await?;
//! assert_eq!(store.get_nonce(&user_id).await?.as_deref(), Some("b5f1c2"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod rocks;
pub mod schema;
pub mod types;

pub use error::{Result, StoreError};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;
pub use rocks::RocksStore;
pub use types::UserRecord;

use async_trait::async_trait;
use authkit_core::{UserId, WalletAddress};

/// The storage trait for wallet linking state.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
#[async_trait]
pub trait UserStore: Send + Sync {
    // =========================================================================
    // Challenge Nonces
    // =========================================================================

    /// Get the user's current challenge nonce.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_nonce(&self, user_id: &UserId) -> Result<Option<String>>;

    /// Store a challenge nonce for the user.
    ///
    /// Overwrites any previous nonce, so at most one challenge is outstanding
    /// per user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn set_nonce(&self, user_id: &UserId, nonce: &str) -> Result<()>;

    /// Remove the user's challenge nonce if it still equals `expected`.
    ///
    /// Returns `true` only for the caller that removed it. A nonce replaced
    /// by a newer challenge, or already taken, is left alone and yields
    /// `false`. The compare and the delete are atomic with respect to
    /// [`set_nonce`](Self::set_nonce) and other takes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn take_nonce_if(&self, user_id: &UserId, expected: &str) -> Result<bool>;

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Get a user record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserRecord>>;

    /// Record that the user controls the given wallet, creating the user
    /// record if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn set_wallet_address(&self, user_id: &UserId, address: &WalletAddress) -> Result<()>;

    /// Get the wallet linked to the user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_wallet_address(&self, user_id: &UserId) -> Result<Option<WalletAddress>> {
        Ok(self
            .get_user(user_id)
            .await?
            .and_then(|user| user.wallet_address))
    }
}
