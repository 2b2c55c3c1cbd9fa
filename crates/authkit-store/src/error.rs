//! Storage errors.

use thiserror::Error;

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure reading or writing user records and nonces.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `RocksDB` rejected the operation.
    #[error("database error: {0}")]
    Database(#[from] rocksdb::Error),

    /// The database was opened without one of our column families.
    #[error("missing column family: {0}")]
    MissingColumnFamily(&'static str),

    /// A stored value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}
