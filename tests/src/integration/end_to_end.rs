//! # End-to-End Flows
//!
//! A producer builds a tree off-chain, anchors its root, and consumers
//! check records against it while the batch moves through its lifecycle.

#[cfg(test)]
mod tests {
    use crate::fixtures::{request, Harness, SortedPairTree, ADMIN, NOW, PUBLISHER};
    use proof_registry::{BatchType, ProofRegistryApi, PublishBatchRequest, RegistryError};

    #[test]
    fn test_deposit_yield_lifecycle() {
        let mut h = Harness::new();
        let deposits = SortedPairTree::from_records(&["alice:100", "bob:250"]);
        let yields = SortedPairTree::from_records(&["alice:1.5", "bob:3.75", "carol:0.2"]);

        let first = h.publish(deposits.root(), BatchType::Deposit, 2);
        assert_eq!(first, 1);

        h.registry.verify_batch(PUBLISHER, first).unwrap();
        assert!(h.registry.get_batch(first).unwrap().verified);

        let second = h.publish(yields.root(), BatchType::Yield, 3);
        assert_eq!(second, 2);

        assert_eq!(h.registry.get_batch_count_by_type(BatchType::Deposit), 1);
        assert_eq!(
            h.registry.get_batches_by_type(BatchType::Deposit, 0, 10).unwrap(),
            vec![1]
        );

        h.registry.revoke_batch(ADMIN, first, "bad data").unwrap();
        assert_eq!(
            h.registry.get_batch(first),
            Err(RegistryError::InvalidBatchId(1))
        );
        assert_eq!(h.registry.get_batch_id_by_root(&deposits.root()), None);
        assert_eq!(h.registry.get_batch(second).unwrap().merkle_root, yields.root());

        assert_eq!(
            h.event_names(),
            vec!["BatchPublished", "BatchVerified", "BatchPublished", "BatchRevoked"]
        );
    }

    #[test]
    fn test_root_and_id_agree_for_every_batch() {
        let h = Harness::new();
        let mut published = Vec::new();
        for (i, batch_type) in BatchType::ALL.iter().cycle().take(12).enumerate() {
            let records = [format!("record-{i}-a"), format!("record-{i}-b")];
            let tree = SortedPairTree::from_records(&records);
            let id = h.publish(tree.root(), *batch_type, 2);
            published.push((id, tree.root()));
        }

        for (id, root) in published {
            assert_eq!(h.registry.get_batch_id_by_root(&root), Some(id));
            assert_eq!(h.registry.get_batch(id).unwrap().merkle_root, root);
        }
        assert_eq!(h.registry.get_batch_count(), 12);
        for batch_type in BatchType::ALL {
            assert_eq!(h.registry.get_batch_count_by_type(batch_type), 3);
        }
    }

    #[test]
    fn test_every_leaf_proves_against_its_batch() {
        let h = Harness::new();
        let records: Vec<String> = (0..9)
            .map(|i| format!("withdrawal-{i}:{}", i * 10))
            .collect();
        let tree = SortedPairTree::from_records(&records);
        let id = h.publish(tree.root(), BatchType::Withdraw, records.len() as u64);

        for i in 0..tree.len() {
            assert!(h
                .registry
                .verify_proof(id, &tree.leaf(i), &tree.proof(i))
                .unwrap());
        }

        // A record from a different batch does not verify.
        let foreign = SortedPairTree::from_records(&["withdrawal-0:0", "intruder:1"]);
        assert!(!h
            .registry
            .verify_proof(id, &foreign.leaf(1), &tree.proof(1))
            .unwrap());
    }

    #[test]
    fn test_single_leaf_batch() {
        let h = Harness::new();
        let tree = SortedPairTree::from_records(&["solo-trade"]);
        let id = h.publish(tree.root(), BatchType::Trade, 1);

        assert!(h.registry.verify_proof(id, &tree.leaf(0), &[]).unwrap());
        assert!(h.registry.verify_proof_for_root(&tree.root(), &tree.leaf(0), &[]));
        assert!(!h.registry.verify_proof(id, &[0x42; 32], &[]).unwrap());
    }

    #[test]
    fn test_pagination_after_revocation_keeps_dangling_ids() {
        let h = Harness::new();
        for byte in 1..=4u8 {
            h.publish([byte; 32], BatchType::Deposit, 1);
        }
        h.registry.revoke_batch(ADMIN, 3, "duplicate upload").unwrap();

        let page = h
            .registry
            .get_batches_by_type(BatchType::Deposit, 0, 10)
            .unwrap();
        assert_eq!(page, vec![4, 3, 2, 1]);
        assert_eq!(h.registry.get_batch_count_by_type(BatchType::Deposit), 4);

        let live: Vec<_> = page
            .into_iter()
            .filter_map(|id| h.registry.get_batch(id).ok())
            .map(|b| b.id)
            .collect();
        assert_eq!(live, vec![4, 2, 1]);

        let latest: Vec<_> = h
            .registry
            .latest_batches(10)
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(latest, vec![4, 2, 1]);

        let stats = h.registry.stats();
        assert_eq!(stats.total_published, 4);
        assert_eq!(stats.live_batches, 3);
        assert_eq!(stats.revoked_batches, 1);
    }

    #[test]
    fn test_revoked_root_can_be_republished() {
        let h = Harness::new();
        let tree = SortedPairTree::from_records(&["a", "b"]);
        let first = h.publish(tree.root(), BatchType::Yield, 2);
        h.registry.revoke_batch(ADMIN, first, "wrong period").unwrap();

        let second = h.publish(tree.root(), BatchType::Yield, 2);
        assert_eq!(second, 2);
        assert_eq!(h.registry.get_batch_id_by_root(&tree.root()), Some(2));
        assert_eq!(h.registry.next_batch_id(), 3);
    }

    #[test]
    fn test_clock_governs_end_timestamp() {
        let h = Harness::new();
        let ahead = PublishBatchRequest {
            end_timestamp: NOW + 60,
            ..request([9; 32], BatchType::Trade, 1)
        };
        assert_eq!(
            h.registry.publish_batch(PUBLISHER, ahead.clone()),
            Err(RegistryError::FutureEndTimestamp {
                end: NOW + 60,
                now: NOW
            })
        );

        h.clock.advance(60);
        assert_eq!(h.registry.publish_batch(PUBLISHER, ahead), Ok(1));
        assert_eq!(h.registry.get_batch(1).unwrap().created_at, NOW + 60);
    }
}
