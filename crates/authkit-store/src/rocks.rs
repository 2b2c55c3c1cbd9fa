//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `UserStore` trait.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use authkit_core::{UserId, WalletAddress};
use parking_lot::Mutex;
use rocksdb::{BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options};

use crate::error::{Result, StoreError};
use crate::schema::{all_column_families, cf, user_key};
use crate::types::UserRecord;
use crate::UserStore;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Serializes nonce writes so compare-and-delete sees no interleaved set.
    nonce_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            nonce_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &'static str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or(StoreError::MissingColumnFamily(name))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn write_nonce(&self, user_id: &UserId, nonce: &str) -> Result<()> {
        let cf = self.cf(cf::WALLET_NONCES)?;
        let _guard = self.nonce_lock.lock();

        self.db.put_cf(&cf, user_key(user_id), nonce.as_bytes())?;
        Ok(())
    }

    fn take_nonce_sync(&self, user_id: &UserId, expected: &str) -> Result<bool> {
        let cf = self.cf(cf::WALLET_NONCES)?;
        let key = user_key(user_id);
        let _guard = self.nonce_lock.lock();

        let matches = self
            .db
            .get_pinned_cf(&cf, &key)?
            .is_some_and(|current| &*current == expected.as_bytes());
        if matches {
            self.db.delete_cf(&cf, &key)?;
        }
        Ok(matches)
    }

    fn read_user(&self, user_id: &UserId) -> Result<Option<UserRecord>> {
        let cf = self.cf(cf::USERS)?;

        self.db
            .get_cf(&cf, user_key(user_id))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }
}

#[async_trait]
impl UserStore for RocksStore {
    // =========================================================================
    // Challenge Nonces
    // =========================================================================

    async fn get_nonce(&self, user_id: &UserId) -> Result<Option<String>> {
        let cf = self.cf(cf::WALLET_NONCES)?;

        self.db
            .get_cf(&cf, user_key(user_id))?
            .map(|data| {
                String::from_utf8(data).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .transpose()
    }

    async fn set_nonce(&self, user_id: &UserId, nonce: &str) -> Result<()> {
        self.write_nonce(user_id, nonce)
    }

    async fn take_nonce_if(&self, user_id: &UserId, expected: &str) -> Result<bool> {
        self.take_nonce_sync(user_id, expected)
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserRecord>> {
        self.read_user(user_id)
    }

    async fn set_wallet_address(&self, user_id: &UserId, address: &WalletAddress) -> Result<()> {
        let cf = self.cf(cf::USERS)?;

        let mut record = self
            .read_user(user_id)?
            .unwrap_or_else(|| UserRecord::new(user_id.clone()));
        record.link_wallet(*address);

        let value = Self::serialize(&record)?;
        self.db.put_cf(&cf, user_key(user_id), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn nonce_lifecycle() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::new("u1").unwrap();

        assert!(store.get_nonce(&user_id).await.unwrap().is_none());

        store.set_nonce(&user_id, "first").await.unwrap();
        assert_eq!(
            store.get_nonce(&user_id).await.unwrap().as_deref(),
            Some("first")
        );

        // A second nonce replaces the first
        store.set_nonce(&user_id, "second").await.unwrap();
        assert_eq!(
            store.get_nonce(&user_id).await.unwrap().as_deref(),
            Some("second")
        );

        // Only the current nonce can be taken, and only once
        assert!(!store.take_nonce_if(&user_id, "first").await.unwrap());
        assert_eq!(
            store.get_nonce(&user_id).await.unwrap().as_deref(),
            Some("second")
        );
        assert!(store.take_nonce_if(&user_id, "second").await.unwrap());
        assert!(store.get_nonce(&user_id).await.unwrap().is_none());
        assert!(!store.take_nonce_if(&user_id, "second").await.unwrap());
    }

    #[tokio::test]
    async fn nonces_are_per_user() {
        let (store, _dir) = create_test_store();
        let alice = UserId::new("alice").unwrap();
        let bob = UserId::new("bob").unwrap();

        store.set_nonce(&alice, "a").await.unwrap();
        store.set_nonce(&bob, "b").await.unwrap();

        assert_eq!(store.get_nonce(&alice).await.unwrap().as_deref(), Some("a"));
        assert_eq!(store.get_nonce(&bob).await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn wallet_link_creates_record() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::new("u1").unwrap();
        let address = WalletAddress::from_bytes([9u8; 32]);

        assert!(store.get_user(&user_id).await.unwrap().is_none());
        assert!(store.get_wallet_address(&user_id).await.unwrap().is_none());

        store.set_wallet_address(&user_id, &address).await.unwrap();

        let record = store.get_user(&user_id).await.unwrap().unwrap();
        assert_eq!(record.wallet_address, Some(address));
        assert!(record.wallet_linked_at.is_some());
        assert_eq!(
            store.get_wallet_address(&user_id).await.unwrap(),
            Some(address)
        );
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let user_id = UserId::new("u1").unwrap();

        {
            let store = RocksStore::open(dir.path()).unwrap();
            store.set_nonce(&user_id, "persisted").await.unwrap();
        }

        let store = RocksStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get_nonce(&user_id).await.unwrap().as_deref(),
            Some("persisted")
        );
    }
}
