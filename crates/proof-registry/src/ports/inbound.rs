//! # Inbound Ports (Driving Ports)
//!
//! The registry API. Mutating operations take the caller identity
//! explicitly; the transport that drives the registry is responsible for
//! authenticating it.

use crate::domain::entities::{Batch, PublishBatchRequest, RegistryStats};
use crate::domain::errors::RegistryError;
use shared_types::entities::{Address, BatchId, BatchType, Hash, Role};

/// Proof registry operations.
///
/// Every mutating call is atomic: it fully applies (persisted, applied in
/// memory, event emitted) or fails with no observable change. Role checks
/// run before any argument validation.
pub trait ProofRegistryApi: Send + Sync {
    // =========================================================================
    // BATCH LIFECYCLE
    // =========================================================================

    /// Anchor a new batch. PUBLISHER only, not while paused.
    fn publish_batch(
        &self,
        caller: Address,
        request: PublishBatchRequest,
    ) -> Result<BatchId, RegistryError>;

    /// Mark a batch verified. PUBLISHER only.
    fn verify_batch(&self, caller: Address, id: BatchId) -> Result<(), RegistryError>;

    /// Delete a batch and release its root. ADMIN only.
    fn revoke_batch(&self, caller: Address, id: BatchId, reason: &str)
        -> Result<(), RegistryError>;

    // =========================================================================
    // PAUSABILITY
    // =========================================================================

    /// Block publication. PAUSER only.
    fn pause(&self, caller: Address) -> Result<(), RegistryError>;

    /// Resume publication. PAUSER only.
    fn unpause(&self, caller: Address) -> Result<(), RegistryError>;

    /// Whether publication is blocked.
    fn is_paused(&self) -> bool;

    // =========================================================================
    // ACCESS CONTROL
    // =========================================================================

    /// Give `account` a role. ADMIN only. Returns whether state changed.
    fn grant_role(&self, caller: Address, role: Role, account: Address)
        -> Result<bool, RegistryError>;

    /// Take a role from `account`. ADMIN only. Returns whether state changed.
    fn revoke_role(&self, caller: Address, role: Role, account: Address)
        -> Result<bool, RegistryError>;

    /// Drop one of the caller's own roles. Returns whether state changed.
    fn renounce_role(&self, caller: Address, role: Role) -> Result<bool, RegistryError>;

    /// True if `account` holds `role`.
    fn has_role(&self, role: Role, account: &Address) -> bool;

    /// Holders of `role`, sorted.
    fn role_members(&self, role: Role) -> Vec<Address>;

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Live batch by id. `InvalidBatchId` if zero, unknown or revoked.
    fn get_batch(&self, id: BatchId) -> Result<Batch, RegistryError>;

    /// Id of the live batch holding `root`.
    fn get_batch_id_by_root(&self, root: &Hash) -> Option<BatchId>;

    /// Batches ever published.
    fn get_batch_count(&self) -> u64;

    /// Type index length, revoked ids included.
    fn get_batch_count_by_type(&self, batch_type: BatchType) -> u64;

    /// Newest-first page of ids of one type.
    fn get_batches_by_type(
        &self,
        batch_type: BatchType,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<BatchId>, RegistryError>;

    /// Newest live batches across all types.
    fn latest_batches(&self, limit: usize) -> Result<Vec<Batch>, RegistryError>;

    /// Id the next successful publish will receive.
    fn next_batch_id(&self) -> BatchId;

    /// Registry-wide counters.
    fn stats(&self) -> RegistryStats;

    // =========================================================================
    // PROOF VERIFICATION
    // =========================================================================

    /// Check `leaf` against the stored root of batch `id`.
    ///
    /// A non-matching proof is `Ok(false)`; only an unknown id is an error.
    fn verify_proof(&self, id: BatchId, leaf: &Hash, proof: &[Hash])
        -> Result<bool, RegistryError>;

    /// Stateless check against a caller-supplied root.
    fn verify_proof_for_root(&self, root: &Hash, leaf: &Hash, proof: &[Hash]) -> bool;
}
