//! # Lifecycle Abuse
//!
//! Replayed roots, double verification, pause toggling and boundary
//! inputs from an authorized but careless publisher.

#[cfg(test)]
mod tests {
    use crate::fixtures::{request, Harness, ADMIN, NOW, PUBLISHER};
    use proof_registry::{
        BatchType, ErrorClass, ProofRegistryApi, PublishBatchRequest, RegistryError,
        MAX_PAGE_LIMIT,
    };

    #[test]
    fn test_replayed_root_rejected_across_types() {
        let h = Harness::new();
        h.publish([1; 32], BatchType::Deposit, 1);
        assert_eq!(
            h.registry
                .publish_batch(PUBLISHER, request([1; 32], BatchType::Withdraw, 1)),
            Err(RegistryError::DuplicateRoot {
                root: [1; 32],
                existing: 1
            })
        );
        assert_eq!(h.registry.next_batch_id(), 2);
        assert_eq!(h.registry.get_batch_count_by_type(BatchType::Withdraw), 0);
    }

    #[test]
    fn test_double_verify_and_verify_after_revoke() {
        let h = Harness::new();
        h.publish([1; 32], BatchType::Yield, 1);
        h.registry.verify_batch(PUBLISHER, 1).unwrap();
        assert_eq!(
            h.registry.verify_batch(PUBLISHER, 1),
            Err(RegistryError::AlreadyVerified(1))
        );

        h.registry.revoke_batch(ADMIN, 1, "").unwrap();
        assert_eq!(
            h.registry.verify_batch(PUBLISHER, 1),
            Err(RegistryError::InvalidBatchId(1))
        );
        assert_eq!(
            h.registry.revoke_batch(ADMIN, 1, "again"),
            Err(RegistryError::InvalidBatchId(1))
        );
        assert_eq!(
            h.registry.verify_proof(1, &[1; 32], &[]),
            Err(RegistryError::InvalidBatchId(1))
        );
    }

    #[test]
    fn test_ids_never_reused() {
        let h = Harness::new();
        let mut seen = Vec::new();
        for round in 0..5u8 {
            let id = h.publish([round + 1; 32], BatchType::Trade, 1);
            h.registry.revoke_batch(ADMIN, id, "churn").unwrap();
            seen.push(id);
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(h.registry.get_batch_count(), 5);
        assert!(h.registry.latest_batches(10).unwrap().is_empty());
    }

    #[test]
    fn test_pause_blocks_only_publication() {
        let mut h = Harness::new();
        h.publish([1; 32], BatchType::Deposit, 1);
        h.publish([2; 32], BatchType::Deposit, 1);
        h.registry.pause(ADMIN).unwrap();

        assert_eq!(
            h.registry
                .publish_batch(PUBLISHER, request([3; 32], BatchType::Deposit, 1)),
            Err(RegistryError::ContractPaused)
        );
        // Even an invalid request reports the pause first.
        assert_eq!(
            h.registry
                .publish_batch(PUBLISHER, request([0; 32], BatchType::Deposit, 0)),
            Err(RegistryError::ContractPaused)
        );

        h.registry.verify_batch(PUBLISHER, 1).unwrap();
        h.registry.revoke_batch(ADMIN, 2, "paused cleanup").unwrap();
        assert!(h.registry.get_batch(1).unwrap().verified);
        assert_eq!(
            h.registry.get_batches_by_type(BatchType::Deposit, 0, 5).unwrap(),
            vec![2, 1]
        );

        assert_eq!(h.registry.pause(ADMIN), Err(RegistryError::AlreadyPaused));
        h.registry.unpause(ADMIN).unwrap();
        assert_eq!(h.registry.unpause(ADMIN), Err(RegistryError::NotPaused));
        assert_eq!(h.publish([3; 32], BatchType::Deposit, 1), 3);

        let names = h.event_names();
        assert_eq!(
            names,
            vec![
                "BatchPublished",
                "BatchPublished",
                "Paused",
                "BatchVerified",
                "BatchRevoked",
                "Unpaused",
                "BatchPublished"
            ]
        );
    }

    #[test]
    fn test_boundary_timestamps() {
        let h = Harness::new();
        let at = |start, end| PublishBatchRequest {
            start_timestamp: start,
            end_timestamp: end,
            ..request([7; 32], BatchType::Trade, 1)
        };

        assert_eq!(
            h.registry.publish_batch(PUBLISHER, at(NOW, NOW)),
            Err(RegistryError::InvalidTimestampRange {
                start: NOW,
                end: NOW
            })
        );
        assert!(matches!(
            h.registry.publish_batch(PUBLISHER, at(NOW, NOW + 1)),
            Err(RegistryError::FutureEndTimestamp { .. })
        ));
        // end == now is allowed, as is start == 0.
        assert_eq!(h.registry.publish_batch(PUBLISHER, at(0, NOW)), Ok(1));
    }

    #[test]
    fn test_validation_order_reports_first_failure() {
        let h = Harness::new();
        let everything_wrong = PublishBatchRequest {
            root: [0; 32],
            batch_type: 9,
            start_timestamp: NOW + 10,
            end_timestamp: NOW + 5,
            uri: String::new(),
            entry_count: 0,
        };
        let mut req = everything_wrong;
        assert_eq!(
            h.registry.publish_batch(PUBLISHER, req.clone()),
            Err(RegistryError::InvalidRoot)
        );
        req.root = [1; 32];
        assert_eq!(
            h.registry.publish_batch(PUBLISHER, req.clone()),
            Err(RegistryError::InvalidBatchType(9))
        );
        req.batch_type = BatchType::Yield.code();
        assert!(matches!(
            h.registry.publish_batch(PUBLISHER, req.clone()),
            Err(RegistryError::InvalidTimestampRange { .. })
        ));
        req.start_timestamp = NOW;
        assert!(matches!(
            h.registry.publish_batch(PUBLISHER, req.clone()),
            Err(RegistryError::FutureEndTimestamp { .. })
        ));
        req.start_timestamp = NOW - 10;
        req.end_timestamp = NOW;
        let err = h.registry.publish_batch(PUBLISHER, req.clone()).unwrap_err();
        assert_eq!(err, RegistryError::InvalidEntryCount);
        assert_eq!(err.class(), ErrorClass::Validation);

        req.entry_count = 1;
        assert_eq!(h.registry.publish_batch(PUBLISHER, req), Ok(1));
        // An empty uri is stored verbatim.
        assert_eq!(h.registry.get_batch(1).unwrap().uri, "");
    }

    #[test]
    fn test_page_limits() {
        let h = Harness::new();
        for byte in 1..=3u8 {
            h.publish([byte; 32], BatchType::Withdraw, 1);
        }
        for limit in [0, MAX_PAGE_LIMIT + 1, usize::MAX] {
            assert!(matches!(
                h.registry.get_batches_by_type(BatchType::Withdraw, 0, limit),
                Err(RegistryError::InvalidLimit { .. })
            ));
        }
        assert_eq!(
            h.registry
                .get_batches_by_type(BatchType::Withdraw, 0, MAX_PAGE_LIMIT)
                .unwrap(),
            vec![3, 2, 1]
        );
        assert_eq!(
            h.registry.get_batches_by_type(BatchType::Withdraw, 1, 1).unwrap(),
            vec![2]
        );
        assert!(h
            .registry
            .get_batches_by_type(BatchType::Withdraw, 3, 10)
            .unwrap()
            .is_empty());
        assert!(h
            .registry
            .get_batches_by_type(BatchType::Withdraw, usize::MAX, 10)
            .unwrap()
            .is_empty());
        assert!(h
            .registry
            .get_batches_by_type(BatchType::Deposit, 0, 10)
            .unwrap()
            .is_empty());
    }
}
