//! # Proof Registry
//!
//! Anchors Merkle roots of externally computed data batches and lets any
//! caller check that a single record belonged to an anchored batch.
//!
//! A trusted publisher submits one root per batch together with its
//! metadata (type, covered period, record count, location of the full data
//! set). The registry never sees the records themselves: consumers hold a
//! leaf and its sibling path and ask the registry to recompute the root.
//!
//! ## Batch Lifecycle
//!
//! ```text
//!   publish_batch ──▶ [unverified] ──verify_batch──▶ [verified]
//!                          │                             │
//!                          └────────revoke_batch─────────┴──▶ (deleted)
//! ```
//!
//! ## Invariants
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Ids are sequential from 1 and never reused | `BatchStore::next_batch_id` only grows |
//! | A live root maps to exactly one batch | root index checked on publish, cleared on revoke |
//! | `start < end <= now` at publish | `domain::invariants` |
//! | `entry_count >= 1` | `domain::invariants` |
//! | `verified` flips false to true once | `BatchStore::mark_verified` |
//! | Mutations are all-or-nothing | one write lock, one atomic store batch |
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): batch store, validation rules, Merkle verifier
//! - **Ports Layer** (`ports/`): inbound API, outbound authority / clock / storage
//! - **Adapters Layer** (`adapters/`): in-memory store, clocks, role registry
//! - **Service** (`service/`): the registry aggregate wiring it all together

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FailingKVStore, InMemoryKVStore, ManualClock, RoleRegistry, SystemTimeSource};
pub use domain::{
    hash_leaf, hash_pair, keccak256, process_proof, role_from_id, role_id, verify, Batch,
    BatchStore, ErrorClass, KVStoreError, MerkleProof, PublishBatchRequest, RegistryError,
    RegistryErrorPayload, RegistryStats, TypeIndexLen, MAX_PAGE_LIMIT,
};
pub use ports::{
    AuthorityProvider, BatchOperation, KeyValueStore, ProofRegistryApi, RoleAdministration,
    TimeSource,
};
pub use service::ProofRegistryService;
pub use shared_types::entities::{Address, BatchId, BatchType, Hash, Role, Timestamp};
