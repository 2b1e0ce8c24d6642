//! # Node Configuration
//!
//! Settings loaded from `PR_*` environment variables. CLI flags are applied
//! on top of the loaded values by the binary.
//!
//! | Variable               | Default   | Meaning                              |
//! |------------------------|-----------|--------------------------------------|
//! | `PR_DATA_DIR`          | `./data`  | Directory holding the store          |
//! | `PR_STORAGE`           | see below | `memory`, `file` or `rocksdb`        |
//! | `PR_ADMIN_ADDRESS`     | unset     | Initial admin (fresh store only)     |
//! | `PR_PUBLISHER_ADDRESS` | unset     | Initial publisher (fresh store only) |
//! | `PR_SYNC_WRITES`       | `true`    | fsync every committed write          |
//! | `PR_EVENT_CAPACITY`    | `1000`    | Event bus buffer per subscriber      |
//!
//! The storage default is `rocksdb` when that feature is compiled in and
//! `file` otherwise.

use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_types::entities::{parse_address, Address};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An address variable is not 20 bytes of hex.
    #[error("{var}: {reason}")]
    InvalidAddress {
        /// Variable name.
        var: &'static str,
        /// Parser message.
        reason: String,
    },

    /// A boolean variable has an unrecognised value.
    #[error("{var}: expected true or false, got {value:?}")]
    InvalidBool {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// A numeric variable is not a positive integer.
    #[error("{var}: expected a positive integer, got {value:?}")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// Unknown storage backend name.
    #[error("unknown storage backend {0:?} (expected memory, file or rocksdb)")]
    UnknownBackend(String),

    /// The backend exists but was not compiled into this binary.
    #[error("storage backend {0} is not available; rebuild with --features {0}")]
    BackendUnavailable(&'static str),
}

/// Where the registry keeps its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process memory; state is lost on exit.
    Memory,
    /// Single snapshot file rewritten atomically on every commit.
    File,
    /// RocksDB database (feature `rocksdb`).
    RocksDb,
}

impl StorageBackend {
    /// Lowercase backend name.
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::File => "file",
            StorageBackend::RocksDb => "rocksdb",
        }
    }

    /// True if this binary can open the backend.
    pub fn is_available(&self) -> bool {
        match self {
            StorageBackend::Memory | StorageBackend::File => true,
            StorageBackend::RocksDb => cfg!(feature = "rocksdb"),
        }
    }
}

impl Default for StorageBackend {
    fn default() -> Self {
        if cfg!(feature = "rocksdb") {
            StorageBackend::RocksDb
        } else {
            StorageBackend::File
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" | "in-memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "rocksdb" | "rocks" => Ok(StorageBackend::RocksDb),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Directory holding the store.
    pub data_dir: PathBuf,
    /// Storage backend.
    pub storage: StorageBackend,
    /// Initial admin, used only when the store is empty.
    pub admin: Option<Address>,
    /// Initial publisher, used only when the store is empty.
    pub publisher: Option<Address>,
    /// fsync every committed write.
    pub sync_writes: bool,
    /// Event bus buffer per subscriber.
    pub event_capacity: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage: StorageBackend::default(),
            admin: None,
            publisher: None,
            sync_writes: true,
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl NodeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let storage = match get("PR_STORAGE") {
            Some(value) => value.parse()?,
            None => defaults.storage,
        };

        Ok(Self {
            data_dir: get("PR_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            storage,
            admin: get("PR_ADMIN_ADDRESS")
                .map(|v| parse_address_var("PR_ADMIN_ADDRESS", &v))
                .transpose()?,
            publisher: get("PR_PUBLISHER_ADDRESS")
                .map(|v| parse_address_var("PR_PUBLISHER_ADDRESS", &v))
                .transpose()?,
            sync_writes: get("PR_SYNC_WRITES")
                .map(|v| parse_bool_var("PR_SYNC_WRITES", &v))
                .transpose()?
                .unwrap_or(defaults.sync_writes),
            event_capacity: get("PR_EVENT_CAPACITY")
                .map(|v| parse_positive_var("PR_EVENT_CAPACITY", &v))
                .transpose()?
                .unwrap_or(defaults.event_capacity),
        })
    }

    /// Reject settings this binary cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.storage.is_available() {
            return Err(ConfigError::BackendUnavailable(self.storage.name()));
        }
        Ok(())
    }

    /// Both bootstrap identities, if configured.
    pub fn bootstrap_identities(&self) -> Option<(Address, Address)> {
        self.admin.zip(self.publisher)
    }

    /// Path of the store for the configured backend.
    pub fn storage_path(&self) -> PathBuf {
        match self.storage {
            StorageBackend::Memory => PathBuf::new(),
            StorageBackend::File => self.data_dir.join("registry.db"),
            StorageBackend::RocksDb => self.data_dir.join("rocksdb"),
        }
    }
}

fn parse_address_var(var: &'static str, value: &str) -> Result<Address, ConfigError> {
    parse_address(value.trim()).map_err(|e| ConfigError::InvalidAddress {
        var,
        reason: e.to_string(),
    })
}

fn parse_bool_var(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

fn parse_positive_var(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}
