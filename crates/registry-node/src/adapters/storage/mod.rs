//! # Storage Backends
//!
//! [`NodeStore`] dispatches to whichever backend the node was configured
//! with, so the registry is built over one concrete store type.

mod file_store;
#[cfg(feature = "rocksdb")]
mod rocksdb_adapter;

pub use file_store::FileKVStore;
#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};

use crate::config::{ConfigError, NodeConfig, StorageBackend};
use proof_registry::{BatchOperation, InMemoryKVStore, KVStoreError, KeyValueStore};

/// Storage selected at startup.
pub enum NodeStore {
    /// Process memory.
    Memory(InMemoryKVStore),
    /// Snapshot file.
    File(FileKVStore),
    /// RocksDB database.
    #[cfg(feature = "rocksdb")]
    RocksDb(RocksDbStore),
}

/// Errors raised while opening a backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageOpenError {
    /// The configuration names a backend this build cannot open.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend itself failed to open.
    #[error("failed to open {backend} store: {source}")]
    Backend {
        /// Backend name.
        backend: &'static str,
        /// Underlying error.
        source: KVStoreError,
    },
}

impl NodeStore {
    /// Open the backend named by `config`.
    pub fn open(config: &NodeConfig) -> Result<Self, StorageOpenError> {
        config.validate()?;
        let backend = config.storage.name();
        let wrap = |source| StorageOpenError::Backend { backend, source };

        match config.storage {
            StorageBackend::Memory => Ok(NodeStore::Memory(InMemoryKVStore::new())),
            StorageBackend::File => FileKVStore::open(config.storage_path(), config.sync_writes)
                .map(NodeStore::File)
                .map_err(wrap),
            #[cfg(feature = "rocksdb")]
            StorageBackend::RocksDb => {
                let rocks = RocksDbConfig {
                    path: config.storage_path(),
                    sync_writes: config.sync_writes,
                    ..RocksDbConfig::default()
                };
                RocksDbStore::open(rocks).map(NodeStore::RocksDb).map_err(wrap)
            }
            #[cfg(not(feature = "rocksdb"))]
            StorageBackend::RocksDb => Err(ConfigError::BackendUnavailable(backend).into()),
        }
    }

    /// Backend in use.
    pub fn backend(&self) -> StorageBackend {
        match self {
            NodeStore::Memory(_) => StorageBackend::Memory,
            NodeStore::File(_) => StorageBackend::File,
            #[cfg(feature = "rocksdb")]
            NodeStore::RocksDb(_) => StorageBackend::RocksDb,
        }
    }
}

impl KeyValueStore for NodeStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        match self {
            NodeStore::Memory(kv) => kv.get(key),
            NodeStore::File(kv) => kv.get(key),
            #[cfg(feature = "rocksdb")]
            NodeStore::RocksDb(kv) => kv.get(key),
        }
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        match self {
            NodeStore::Memory(kv) => kv.atomic_batch_write(operations),
            NodeStore::File(kv) => kv.atomic_batch_write(operations),
            #[cfg(feature = "rocksdb")]
            NodeStore::RocksDb(kv) => kv.atomic_batch_write(operations),
        }
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        match self {
            NodeStore::Memory(kv) => kv.prefix_scan(prefix),
            NodeStore::File(kv) => kv.prefix_scan(prefix),
            #[cfg(feature = "rocksdb")]
            NodeStore::RocksDb(kv) => kv.prefix_scan(prefix),
        }
    }
}
