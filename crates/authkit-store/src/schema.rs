//! Database schema definitions and key encoding.
//!
//! Both column families are keyed by the raw user ID bytes.

use authkit_core::UserId;

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// User records (linked wallet), keyed by `user_id`.
    pub const USERS: &str = "users";

    /// The single outstanding wallet challenge nonce, keyed by `user_id`.
    pub const WALLET_NONCES: &str = "wallet_nonces";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::USERS, cf::WALLET_NONCES]
}

/// Encode a user key (the user ID bytes).
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_ref().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_key_is_raw_id() {
        let user_id = UserId::new("u1").unwrap();
        assert_eq!(user_key(&user_id), b"u1".to_vec());
    }

    #[test]
    fn column_families_are_unique() {
        let families = all_column_families();
        assert_eq!(families.len(), 2);
        assert_ne!(families[0], families[1]);
    }
}
