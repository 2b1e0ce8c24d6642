//! # Persistence and Recovery
//!
//! Registry state survives a restart on every durable backend, and a
//! failed write leaves no trace in either the store or memory.

#[cfg(test)]
mod tests {
    use crate::fixtures::{request, Harness, SortedPairTree, ADMIN, OUTSIDER, PUBLISHER};
    use proof_registry::{
        BatchType, FailingKVStore, InMemoryKVStore, KeyValueStore, ProofRegistryApi,
        RegistryError, Role,
    };
    use registry_node::adapters::FileKVStore;
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    /// Drive a registry through every kind of mutation.
    fn populate<KV: KeyValueStore>(h: &Harness<KV>) -> SortedPairTree {
        let tree = SortedPairTree::from_records(&["r1", "r2", "r3"]);
        h.publish(tree.root(), BatchType::Deposit, 3);
        h.publish([2; 32], BatchType::Yield, 1);
        h.publish([3; 32], BatchType::Deposit, 1);
        h.registry.verify_batch(PUBLISHER, 1).unwrap();
        h.registry.revoke_batch(ADMIN, 2, "wrong root").unwrap();
        h.registry.grant_role(ADMIN, Role::Publisher, OUTSIDER).unwrap();
        h.registry.renounce_role(ADMIN, Role::Pauser).unwrap();
        h.registry.grant_role(ADMIN, Role::Pauser, OUTSIDER).unwrap();
        h.registry.pause(OUTSIDER).unwrap();
        tree
    }

    fn assert_recovered<KV: KeyValueStore>(h: &Harness<KV>, tree: &SortedPairTree) {
        let registry = &h.registry;
        assert_eq!(registry.next_batch_id(), 4);
        assert!(registry.is_paused());

        let first = registry.get_batch(1).unwrap();
        assert!(first.verified);
        assert_eq!(first.merkle_root, tree.root());
        assert!(registry
            .verify_proof(1, &tree.leaf(2), &tree.proof(2))
            .unwrap());

        assert_eq!(registry.get_batch(2), Err(RegistryError::InvalidBatchId(2)));
        assert_eq!(registry.get_batch_id_by_root(&[2; 32]), None);
        assert_eq!(registry.get_batch_id_by_root(&[3; 32]), Some(3));
        assert_eq!(
            registry.get_batches_by_type(BatchType::Deposit, 0, 10).unwrap(),
            vec![3, 1]
        );
        assert_eq!(registry.get_batch_count_by_type(BatchType::Yield), 1);

        assert!(registry.has_role(Role::Publisher, &OUTSIDER));
        assert!(registry.has_role(Role::Pauser, &OUTSIDER));
        assert!(!registry.has_role(Role::Pauser, &ADMIN));
        assert!(registry.has_role(Role::Admin, &ADMIN));

        let stats = registry.stats();
        assert_eq!(stats.live_batches, 2);
        assert_eq!(stats.verified_batches, 1);
        assert_eq!(stats.revoked_batches, 1);
    }

    #[test]
    fn test_in_memory_recovery() {
        let h = Harness::new();
        let tree = populate(&h);
        let kv = h.registry.into_store();

        let reopened = Harness::open(kv);
        assert_recovered(&reopened, &tree);
    }

    #[test]
    fn test_file_store_recovery() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.db");

        let tree = {
            let h = Harness::open(FileKVStore::open(&path, false).unwrap());
            populate(&h)
        };

        let reopened = Harness::open(FileKVStore::open(&path, true).unwrap());
        assert_recovered(&reopened, &tree);

        // Recovery continues the id sequence.
        reopened.registry.unpause(OUTSIDER).unwrap();
        assert_eq!(reopened.publish([9; 32], BatchType::Trade, 1), 4);
    }

    #[cfg(feature = "rocksdb")]
    #[test]
    fn test_rocksdb_recovery() {
        use registry_node::adapters::{RocksDbConfig, RocksDbStore};

        let dir = TempDir::new().unwrap();
        let open = || RocksDbStore::open(RocksDbConfig::for_testing(dir.path())).unwrap();

        let tree = {
            let h = Harness::open(open());
            populate(&h)
        };

        let reopened = Harness::open(open());
        assert_recovered(&reopened, &tree);
    }

    #[test]
    fn test_failed_write_changes_nothing() {
        let kv = FailingKVStore::new(InMemoryKVStore::new());
        let fail_writes = kv.switch();
        let mut h = Harness::open(kv);
        h.publish([1; 32], BatchType::Deposit, 1);
        h.drain_events();

        fail_writes.store(true, Ordering::SeqCst);
        let before = h.registry.stats();

        assert!(matches!(
            h.registry
                .publish_batch(PUBLISHER, request([5; 32], BatchType::Trade, 1)),
            Err(RegistryError::Storage(_))
        ));
        assert!(matches!(
            h.registry.verify_batch(PUBLISHER, 1),
            Err(RegistryError::Storage(_))
        ));
        assert!(matches!(
            h.registry.revoke_batch(ADMIN, 1, "x"),
            Err(RegistryError::Storage(_))
        ));
        assert!(matches!(h.registry.pause(ADMIN), Err(RegistryError::Storage(_))));

        assert_eq!(h.registry.stats(), before);
        assert_eq!(h.registry.next_batch_id(), 2);
        assert_eq!(h.registry.get_batch_id_by_root(&[5; 32]), None);
        assert!(!h.registry.get_batch(1).unwrap().verified);
        assert!(h.drain_events().is_empty());

        // Nothing reached the store either.
        let store = h.registry.into_store().into_inner();
        let reopened = Harness::open(store);
        assert_eq!(reopened.registry.next_batch_id(), 2);
        assert!(!reopened.registry.is_paused());
    }

    #[test]
    fn test_node_reopens_file_store() {
        use registry_node::{NodeConfig, RegistryNode, StorageBackend};

        let dir = TempDir::new().unwrap();
        let config = NodeConfig {
            data_dir: dir.path().to_path_buf(),
            storage: StorageBackend::File,
            admin: Some(ADMIN),
            publisher: Some(PUBLISHER),
            sync_writes: false,
            ..NodeConfig::default()
        };

        {
            let node = RegistryNode::open(&config).unwrap();
            node.registry().pause(ADMIN).unwrap();
        }

        let existing = NodeConfig {
            admin: None,
            publisher: None,
            ..config
        };
        let node = RegistryNode::open(&existing).unwrap();
        assert!(node.registry().is_paused());
    }
}
