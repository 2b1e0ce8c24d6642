//! # Domain Entities
//!
//! Batch records and the request that creates them.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, BatchId, BatchType, Hash, Timestamp};

/// An anchored batch.
///
/// Immutable once published except for `verified`, which flips to true at
/// most once. Revocation deletes the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Sequential id, starting at 1.
    pub id: BatchId,
    /// Merkle root over the batch records.
    pub merkle_root: Hash,
    /// Category of the records.
    pub batch_type: BatchType,
    /// Start of the covered period (exclusive lower bound of `end_timestamp`).
    pub start_timestamp: Timestamp,
    /// End of the covered period. Never in the future at publish time.
    pub end_timestamp: Timestamp,
    /// Opaque pointer to the full data set.
    pub uri: String,
    /// Account that published the batch.
    pub publisher: Address,
    /// Number of records committed by the root. At least 1.
    pub entry_count: u64,
    /// Set once by a publisher after off-chain review.
    pub verified: bool,
    /// Registry clock at publication.
    pub created_at: Timestamp,
}

/// Arguments of `publish_batch`.
///
/// `batch_type` is the raw wire code so that unknown codes are reported as
/// `InvalidBatchType` in validation order rather than failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishBatchRequest {
    /// Merkle root. Must be non-zero and not currently registered.
    pub root: Hash,
    /// Batch type code.
    pub batch_type: u8,
    /// Start of the covered period.
    pub start_timestamp: Timestamp,
    /// End of the covered period.
    pub end_timestamp: Timestamp,
    /// Location of the full data set.
    pub uri: String,
    /// Number of records.
    pub entry_count: u64,
}

impl PublishBatchRequest {
    /// Convenience constructor taking a typed batch type.
    pub fn new(
        root: Hash,
        batch_type: BatchType,
        start_timestamp: Timestamp,
        end_timestamp: Timestamp,
        uri: impl Into<String>,
        entry_count: u64,
    ) -> Self {
        Self {
            root,
            batch_type: batch_type.code(),
            start_timestamp,
            end_timestamp,
            uri: uri.into(),
            entry_count,
        }
    }
}

/// Index length for one batch type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeIndexLen {
    /// Batch type.
    pub batch_type: BatchType,
    /// Entries in the type index, revoked ids included.
    pub index_len: u64,
}

/// Registry-wide counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Batches ever published.
    pub total_published: u64,
    /// Batches not revoked.
    pub live_batches: u64,
    /// Live batches marked verified.
    pub verified_batches: u64,
    /// Batches revoked so far.
    pub revoked_batches: u64,
    /// Whether publication is paused.
    pub paused: bool,
    /// Per-type index lengths in type code order.
    pub per_type_index_len: Vec<TypeIndexLen>,
}
