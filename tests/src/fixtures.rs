//! # Test Fixtures
//!
//! `SortedPairTree` builds trees the way an off-chain producer would, using
//! its own Keccak instance so the registry's hashing is checked against an
//! independent implementation. `Harness` wraps a registry over a manual
//! clock with an event subscription attached.

use proof_registry::{
    BatchId, BatchType, Hash, InMemoryKVStore, KeyValueStore, ManualClock, ProofRegistryApi,
    ProofRegistryService, PublishBatchRequest,
};
use sha3::{Digest, Keccak256};
use shared_bus::{EventFilter, InMemoryEventBus, RegistryEvent, Subscription};
use std::sync::Arc;

pub const ADMIN: [u8; 20] = [0xAA; 20];
pub const PUBLISHER: [u8; 20] = [0xBB; 20];
pub const OUTSIDER: [u8; 20] = [0xEE; 20];

/// Registry clock at harness creation.
pub const NOW: u64 = 1_700_000_000;

// =============================================================================
// REFERENCE TREE
// =============================================================================

fn keccak(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Leaf hash of a raw record.
pub fn leaf_of(record: &[u8]) -> Hash {
    keccak(&[record])
}

fn parent(a: &Hash, b: &Hash) -> Hash {
    if a <= b {
        keccak(&[&a[..], &b[..]])
    } else {
        keccak(&[&b[..], &a[..]])
    }
}

/// Binary Merkle tree with sorted-pair hashing. An unpaired node at the end
/// of a level is promoted unchanged.
#[derive(Debug, Clone)]
pub struct SortedPairTree {
    levels: Vec<Vec<Hash>>,
}

impl SortedPairTree {
    /// Build from leaf hashes. Panics on an empty leaf set.
    pub fn from_leaves(leaves: Vec<Hash>) -> Self {
        assert!(!leaves.is_empty(), "tree needs at least one leaf");
        let mut levels = vec![leaves];
        while levels.last().map_or(0, Vec::len) > 1 {
            let below = &levels[levels.len() - 1];
            let above = below
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => parent(a, b),
                    [single] => *single,
                    _ => unreachable!(),
                })
                .collect();
            levels.push(above);
        }
        Self { levels }
    }

    /// Build from raw records.
    pub fn from_records<R: AsRef<[u8]>>(records: &[R]) -> Self {
        Self::from_leaves(records.iter().map(|r| leaf_of(r.as_ref())).collect())
    }

    pub fn root(&self) -> Hash {
        self.levels[self.levels.len() - 1][0]
    }

    pub fn leaf(&self, index: usize) -> Hash {
        self.levels[0][index]
    }

    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Sibling path for the leaf at `index`, leaf level first.
    pub fn proof(&self, index: usize) -> Vec<Hash> {
        let mut proof = Vec::new();
        let mut i = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = i ^ 1;
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            i /= 2;
        }
        proof
    }
}

// =============================================================================
// REGISTRY HARNESS
// =============================================================================

pub type TestRegistry<KV = InMemoryKVStore> = ProofRegistryService<KV, ManualClock>;

/// Registry plus its clock and an all-topics subscription.
pub struct Harness<KV: KeyValueStore = InMemoryKVStore> {
    pub registry: TestRegistry<KV>,
    pub clock: ManualClock,
    pub bus: Arc<InMemoryEventBus>,
    pub events: Subscription,
}

impl Harness {
    /// Fresh in-memory registry bootstrapped with `ADMIN` and `PUBLISHER`.
    pub fn new() -> Self {
        Self::open(InMemoryKVStore::new())
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl<KV: KeyValueStore> Harness<KV> {
    /// Open over an existing store.
    pub fn open(kv: KV) -> Self {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut events = bus.subscribe(EventFilter::all());
        let clock = ManualClock::new(NOW);
        let registry =
            ProofRegistryService::open(kv, clock.clone(), bus.clone(), ADMIN, PUBLISHER)
                .expect("registry opens");
        // Start every scenario after the bootstrap grants.
        events.drain();
        Self {
            registry,
            clock,
            bus,
            events,
        }
    }

    /// Publish `root` as `PUBLISHER` with valid defaults.
    pub fn publish(&self, root: Hash, batch_type: BatchType, entry_count: u64) -> BatchId {
        self.registry
            .publish_batch(PUBLISHER, request(root, batch_type, entry_count))
            .expect("publish succeeds")
    }

    /// Names of pending events, in emission order.
    pub fn event_names(&mut self) -> Vec<&'static str> {
        self.drain_events().iter().map(RegistryEvent::name).collect()
    }

    /// Pending events, in emission order.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        self.events.drain()
    }
}

/// A valid publish request covering the hour before `NOW`.
pub fn request(root: Hash, batch_type: BatchType, entry_count: u64) -> PublishBatchRequest {
    PublishBatchRequest::new(
        root,
        batch_type,
        NOW - 3600,
        NOW,
        format!("ipfs://batch/{}", hex::encode(&root[..4])),
        entry_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proof_registry::{hash_leaf, hash_pair, process_proof};

    #[test]
    fn test_reference_hashing_matches_registry() {
        let a = leaf_of(b"alice:100");
        let b = leaf_of(b"bob:250");
        assert_eq!(a, hash_leaf(b"alice:100"));
        assert_eq!(parent(&a, &b), hash_pair(&a, &b));
        assert_eq!(parent(&b, &a), hash_pair(&a, &b));
    }

    #[test]
    fn test_tree_shapes() {
        let single = SortedPairTree::from_records(&["only"]);
        assert_eq!(single.root(), single.leaf(0));
        assert!(single.proof(0).is_empty());

        let five = SortedPairTree::from_records(&["a", "b", "c", "d", "e"]);
        assert_eq!(five.len(), 5);
        // The fifth leaf is promoted twice, then paired with the top node.
        assert_eq!(five.proof(4).len(), 1);
        for i in 0..five.len() {
            assert_eq!(process_proof(&five.leaf(i), &five.proof(i)), five.root());
        }
    }
}
