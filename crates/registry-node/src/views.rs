//! JSON views of registry records. Hashes and addresses render as
//! `0x`-prefixed lowercase hex.

use proof_registry::{Batch, RegistryStats};
use serde::Serialize;
use shared_types::entities::{to_hex, Address, BatchId, BatchType, Hash, Role, Timestamp};

/// A batch record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchView {
    pub id: BatchId,
    pub merkle_root: String,
    pub batch_type: &'static str,
    pub batch_type_code: u8,
    pub start_timestamp: Timestamp,
    pub end_timestamp: Timestamp,
    pub uri: String,
    pub publisher: String,
    pub entry_count: u64,
    pub verified: bool,
    pub created_at: Timestamp,
}

impl From<&Batch> for BatchView {
    fn from(batch: &Batch) -> Self {
        Self {
            id: batch.id,
            merkle_root: to_hex(&batch.merkle_root),
            batch_type: batch.batch_type.name(),
            batch_type_code: batch.batch_type.code(),
            start_timestamp: batch.start_timestamp,
            end_timestamp: batch.end_timestamp,
            uri: batch.uri.clone(),
            publisher: to_hex(&batch.publisher),
            entry_count: batch.entry_count,
            verified: batch.verified,
            created_at: batch.created_at,
        }
    }
}

/// Registry status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub storage: &'static str,
    pub next_batch_id: BatchId,
    pub total_published: u64,
    pub live_batches: u64,
    pub verified_batches: u64,
    pub revoked_batches: u64,
    pub paused: bool,
    pub per_type_index_len: Vec<TypeCountView>,
}

/// Index length of one batch type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCountView {
    pub batch_type: &'static str,
    pub count: u64,
}

impl StatusView {
    pub fn new(storage: &'static str, next_batch_id: BatchId, stats: &RegistryStats) -> Self {
        Self {
            storage,
            next_batch_id,
            total_published: stats.total_published,
            live_batches: stats.live_batches,
            verified_batches: stats.verified_batches,
            revoked_batches: stats.revoked_batches,
            paused: stats.paused,
            per_type_index_len: stats
                .per_type_index_len
                .iter()
                .map(|entry| TypeCountView {
                    batch_type: entry.batch_type.name(),
                    count: entry.index_len,
                })
                .collect(),
        }
    }
}

/// Result of an inclusion proof check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<BatchId>,
    pub root: String,
    pub computed_root: String,
    pub leaf: String,
    pub proof: Vec<String>,
    pub depth: usize,
    pub valid: bool,
}

/// Role membership of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleView {
    pub role: &'static str,
    pub account: String,
    pub has_role: bool,
}

impl RoleView {
    pub fn new(role: Role, account: &Address, has_role: bool) -> Self {
        Self {
            role: role.name(),
            account: to_hex(account),
            has_role,
        }
    }
}

/// Outcome of a role change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleChangeView {
    pub role: &'static str,
    pub account: String,
    pub changed: bool,
}

/// Ids in one page of a type index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub batch_type: &'static str,
    pub total: u64,
    pub offset: usize,
    pub ids: Vec<BatchId>,
}

impl PageView {
    pub fn new(batch_type: BatchType, total: u64, offset: usize, ids: Vec<BatchId>) -> Self {
        Self {
            batch_type: batch_type.name(),
            total,
            offset,
            ids,
        }
    }
}

/// Render a list of hashes.
pub fn hex_list(hashes: &[Hash]) -> Vec<String> {
    hashes.iter().map(|h| to_hex(h)).collect()
}
