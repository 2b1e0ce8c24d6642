//! Adapters: storage backends for the registry's `KeyValueStore` port.

pub mod storage;

pub use storage::{FileKVStore, NodeStore};
#[cfg(feature = "rocksdb")]
pub use storage::{RocksDbConfig, RocksDbStore};
