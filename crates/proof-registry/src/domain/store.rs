//! # Batch Store
//!
//! Batches keyed by id, a unique root index and one append-only id list
//! per batch type. Revocation removes the record and its root entry but
//! leaves the id in its type list; readers resolving those ids get
//! `None` from [`BatchStore::get`].

use super::entities::{Batch, TypeIndexLen};
use shared_types::entities::{BatchId, BatchType, Hash};
use std::collections::{BTreeMap, HashMap};

/// In-memory indices over published batches.
#[derive(Debug, Clone)]
pub struct BatchStore {
    batches: BTreeMap<BatchId, Batch>,
    root_index: HashMap<Hash, BatchId>,
    type_index: [Vec<BatchId>; 4],
    next_batch_id: BatchId,
}

impl Default for BatchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchStore {
    /// Empty store. The first batch gets id 1.
    pub fn new() -> Self {
        Self {
            batches: BTreeMap::new(),
            root_index: HashMap::new(),
            type_index: Default::default(),
            next_batch_id: 1,
        }
    }

    /// Id the next insert will use.
    pub fn next_batch_id(&self) -> BatchId {
        self.next_batch_id
    }

    /// Position the next id of `batch_type` will take in its type list.
    pub fn next_type_seq(&self, batch_type: BatchType) -> u64 {
        self.type_list(batch_type).len() as u64
    }

    /// Insert a freshly published batch.
    ///
    /// The caller has already checked that `batch.id == next_batch_id()` and
    /// that the root is free.
    pub fn insert(&mut self, batch: Batch) {
        let id = batch.id;
        self.root_index.insert(batch.merkle_root, id);
        self.type_index[usize::from(batch.batch_type.code())].push(id);
        self.batches.insert(id, batch);
        self.next_batch_id = self.next_batch_id.max(id + 1);
    }

    /// Live batch by id.
    pub fn get(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get(&id)
    }

    /// Id of the live batch holding `root`.
    pub fn id_by_root(&self, root: &Hash) -> Option<BatchId> {
        self.root_index.get(root).copied()
    }

    /// Flip `verified`. Returns false if the batch is missing or already verified.
    pub fn mark_verified(&mut self, id: BatchId) -> bool {
        match self.batches.get_mut(&id) {
            Some(batch) if !batch.verified => {
                batch.verified = true;
                true
            }
            _ => false,
        }
    }

    /// Delete a batch and release its root. The type list keeps the id.
    pub fn remove(&mut self, id: BatchId) -> Option<Batch> {
        let batch = self.batches.remove(&id)?;
        self.root_index.remove(&batch.merkle_root);
        Some(batch)
    }

    /// Batches ever published.
    pub fn total_published(&self) -> u64 {
        self.next_batch_id - 1
    }

    /// Batches not revoked.
    pub fn live_count(&self) -> u64 {
        self.batches.len() as u64
    }

    /// Live batches marked verified.
    pub fn verified_count(&self) -> u64 {
        self.batches.values().filter(|b| b.verified).count() as u64
    }

    /// Length of the type list, revoked ids included.
    pub fn count_by_type(&self, batch_type: BatchType) -> u64 {
        self.type_list(batch_type).len() as u64
    }

    /// Newest-first slice of the type list: skip `offset`, take `limit`.
    pub fn page_by_type(&self, batch_type: BatchType, offset: usize, limit: usize) -> Vec<BatchId> {
        let ids = self.type_list(batch_type);
        if offset >= ids.len() {
            return Vec::new();
        }
        let end = ids.len() - offset;
        let start = end.saturating_sub(limit);
        ids[start..end].iter().rev().copied().collect()
    }

    /// Up to `limit` live batches across all types, newest first.
    pub fn latest(&self, limit: usize) -> Vec<Batch> {
        self.batches.values().rev().take(limit).cloned().collect()
    }

    /// Iterate live batches in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Batch> {
        self.batches.values()
    }

    /// Per-type list lengths in code order.
    pub fn type_index_lens(&self) -> Vec<TypeIndexLen> {
        BatchType::ALL
            .into_iter()
            .map(|batch_type| TypeIndexLen {
                batch_type,
                index_len: self.count_by_type(batch_type),
            })
            .collect()
    }

    // =========================================================================
    // RECOVERY
    // =========================================================================

    /// Restore a persisted live batch without touching the type lists.
    pub(crate) fn restore_batch(&mut self, batch: Batch) {
        self.root_index.insert(batch.merkle_root, batch.id);
        self.batches.insert(batch.id, batch);
    }

    /// Append a persisted type-list entry.
    pub(crate) fn restore_type_entry(&mut self, batch_type: BatchType, id: BatchId) {
        self.type_index[usize::from(batch_type.code())].push(id);
    }

    /// Restore the id counter.
    pub(crate) fn restore_next_batch_id(&mut self, next: BatchId) {
        self.next_batch_id = next;
    }

    fn type_list(&self, batch_type: BatchType) -> &[BatchId] {
        &self.type_index[usize::from(batch_type.code())]
    }
}
