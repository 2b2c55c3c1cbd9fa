//! HTTP request handlers.

pub mod health;
pub mod session;
pub mod wallet;
