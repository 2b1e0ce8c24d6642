//! Domain layer: pure registry logic with no I/O.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod merkle;
pub mod store;
pub mod value_objects;

pub use entities::{Batch, PublishBatchRequest, RegistryStats, TypeIndexLen};
pub use errors::{ErrorClass, KVStoreError, RegistryError, RegistryErrorPayload};
pub use merkle::{hash_leaf, hash_pair, keccak256, process_proof, verify, MerkleProof};
pub use store::BatchStore;
pub use value_objects::{role_from_id, role_id, MAX_PAGE_LIMIT};
