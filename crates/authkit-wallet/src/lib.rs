//! Wallet ownership proofs for authkit.
//!
//! A user who already holds a session proves control of a Solana wallet by
//! signing a one-time challenge. This crate provides:
//!
//! - Challenge issuance with a single outstanding nonce per user
//! - Detached ed25519 signature verification
//! - A fallback for wallets that can only sign transactions
//! - Wallet linking on the user record
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use authkit_core::{UserId, WalletAddress};
//! use authkit_store::RocksStore;
//! use authkit_wallet::{WalletAuthenticator, WalletConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RocksStore::open("/tmp/authkit-db")?);
//! let wallet = WalletAuthenticator::new(store, WalletConfig::from_env()?);
//!
//! let user_id = UserId::new("u1")?;
//! let challenge = wallet.issue_challenge(&user_id).await?;
//! println!("Sign this: {challenge}");
//!
//! // Later, with the wallet's response:
//! let address: WalletAddress = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T".parse()?;
//! wallet.link_wallet(&user_id, &address, "3yZe7d...").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod authenticator;
pub mod config;
pub mod error;
pub mod transaction;
pub mod verifier;

pub use authenticator::WalletAuthenticator;
pub use config::WalletConfig;
pub use error::{AuthFailure, AuthFailureKind, ConfigError, Result, WalletError};
pub use transaction::{Transaction, TransactionError};
pub use verifier::{Ed25519Verifier, SignatureVerifier};
