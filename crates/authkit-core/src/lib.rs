//! Core types and utilities for authkit.
//!
//! This crate provides the foundational types shared by the session and wallet
//! authentication crates:
//!
//! - **Identifiers**: `UserId` and the base58 `WalletAddress`
//! - **Tokens**: the `Token` / `TokenPair` values minted by the remote auth API
//! - **Users**: the `User` profile returned by the `me` call
//!
//! # Example
//!
//! ```
//! use authkit_core::{UserId, WalletAddress};
//!
//! let user_id = UserId::new("u1").unwrap();
//! assert_eq!(user_id.as_str(), "u1");
//!
//! let address: WalletAddress = "11111111111111111111111111111111".parse().unwrap();
//! assert_eq!(address.as_bytes(), &[0u8; 32]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;
pub mod token;
pub mod user;

pub use ids::{IdError, UserId, WalletAddress};
pub use token::{Token, TokenPair};
pub use user::User;
