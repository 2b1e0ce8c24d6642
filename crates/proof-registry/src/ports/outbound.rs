//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the registry requires from its host: an identity backend,
//! a clock and a key-value store.

use crate::domain::errors::KVStoreError;
use shared_types::entities::{Address, Role, Timestamp};

/// Answers role membership questions.
///
/// Gate checks in the registry depend only on this trait.
pub trait AuthorityProvider: Send + Sync {
    /// True if `holder` currently has `role`.
    fn has_role(&self, role: Role, holder: &Address) -> bool;
}

/// Mutable role backend.
///
/// Production: `RoleRegistry` (adapters/roles.rs)
pub trait RoleAdministration: AuthorityProvider {
    /// Give `holder` the role. Returns false if it already had it.
    fn grant(&mut self, role: Role, holder: Address) -> bool;

    /// Take the role away. Returns false if `holder` did not have it.
    fn revoke(&mut self, role: Role, holder: &Address) -> bool;

    /// Current holders, sorted.
    fn members(&self, role: Role) -> Vec<Address>;
}

/// Source of the current time in unix seconds.
pub trait TimeSource: Send + Sync {
    /// Current timestamp.
    fn now(&self) -> Timestamp;
}

/// Abstract interface for key-value database operations.
///
/// Production: `RocksDbStore` (registry-node/adapters/storage/rocksdb_adapter.rs)
/// Testing: `InMemoryKVStore`, `FailingKVStore` (adapters/kv_store.rs)
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch are applied, or NONE are.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// All pairs whose key starts with `prefix`, sorted by key.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put {
        /// Key.
        key: Vec<u8>,
        /// Value.
        value: Vec<u8>,
    },
    /// Delete a key.
    Delete {
        /// Key.
        key: Vec<u8>,
    },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }

    /// Key touched by the operation.
    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
        }
    }
}
