//! # File-Backed Key-Value Store
//!
//! Keeps the whole key space in memory and rewrites a single snapshot file
//! on every committed batch. Suited to small registries and to builds
//! without RocksDB.
//!
//! ## File Format
//!
//! ```text
//! [magic: "PRKV"][version: u8][bincode(BTreeMap<Vec<u8>, Vec<u8>>)]
//! ```
//!
//! A batch is applied to a copy of the map, the copy is written to a
//! temporary file, synced and renamed over the snapshot. Only then does the
//! in-memory map change, so a failed write leaves both the file and the
//! store untouched.

use proof_registry::{BatchOperation, KVStoreError, KeyValueStore};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const MAGIC: &[u8; 4] = b"PRKV";
const FORMAT_VERSION: u8 = 1;

type KeySpace = BTreeMap<Vec<u8>, Vec<u8>>;

/// Snapshot-file key-value store.
#[derive(Debug)]
pub struct FileKVStore {
    path: PathBuf,
    data: KeySpace,
    sync_writes: bool,
}

impl FileKVStore {
    /// Open the snapshot at `path`, creating parent directories as needed.
    ///
    /// A missing file yields an empty store. An unreadable or malformed
    /// file is a `CorruptionError`, never an empty store.
    pub fn open(path: impl Into<PathBuf>, sync_writes: bool) -> Result<Self, KVStoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| KVStoreError::IOError {
                message: format!("create {}: {}", parent.display(), e),
            })?;
        }

        let data = if path.exists() {
            let bytes = fs::read(&path).map_err(|e| KVStoreError::IOError {
                message: format!("read {}: {}", path.display(), e),
            })?;
            decode(&bytes)?
        } else {
            KeySpace::new()
        };

        debug!(path = %path.display(), keys = data.len(), "[file-store] Opened");
        Ok(Self {
            path,
            data,
            sync_writes,
        })
    }

    /// Snapshot file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn persist(&self, data: &KeySpace) -> Result<(), KVStoreError> {
        let bytes = encode(data)?;
        let tmp = self.path.with_extension("tmp");
        let io_err = |op: &str, e: std::io::Error| KVStoreError::IOError {
            message: format!("{} {}: {}", op, tmp.display(), e),
        };

        let mut file = fs::File::create(&tmp).map_err(|e| io_err("create", e))?;
        file.write_all(&bytes).map_err(|e| io_err("write", e))?;
        if self.sync_writes {
            file.sync_all().map_err(|e| io_err("sync", e))?;
        }
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| KVStoreError::IOError {
            message: format!("rename {} -> {}: {}", tmp.display(), self.path.display(), e),
        })
    }
}

impl KeyValueStore for FileKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut next = self.data.clone();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    next.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    next.remove(&key);
                }
            }
        }
        self.persist(&next)?;
        self.data = next;
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        Ok(self
            .data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

fn encode(data: &KeySpace) -> Result<Vec<u8>, KVStoreError> {
    let body = bincode::serialize(data).map_err(|e| KVStoreError::IOError {
        message: format!("encode snapshot: {}", e),
    })?;
    let mut bytes = Vec::with_capacity(MAGIC.len() + 1 + body.len());
    bytes.extend_from_slice(MAGIC);
    bytes.push(FORMAT_VERSION);
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

fn decode(bytes: &[u8]) -> Result<KeySpace, KVStoreError> {
    let corrupt = |message: String| KVStoreError::CorruptionError { message };
    if bytes.len() < MAGIC.len() + 1 || &bytes[..MAGIC.len()] != MAGIC {
        return Err(corrupt("snapshot header missing".to_string()));
    }
    let version = bytes[MAGIC.len()];
    if version != FORMAT_VERSION {
        return Err(corrupt(format!("unsupported snapshot version {}", version)));
    }
    bincode::deserialize(&bytes[MAGIC.len() + 1..])
        .map_err(|e| corrupt(format!("decode snapshot: {}", e)))
}
