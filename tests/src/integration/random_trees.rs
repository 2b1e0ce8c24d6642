//! # Randomized Trees
//!
//! Trees of random size and content, checked leaf by leaf, with random
//! tampering that must turn every proof false.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Harness, SortedPairTree};
    use proof_registry::{BatchType, Hash, ProofRegistryApi};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const SEED: u64 = 0x5EED_CAFE;

    fn random_tree(rng: &mut StdRng, max_leaves: usize) -> SortedPairTree {
        let count = rng.gen_range(1..=max_leaves);
        let leaves: Vec<Hash> = (0..count).map(|_| rng.gen()).collect();
        SortedPairTree::from_leaves(leaves)
    }

    #[test]
    fn test_random_trees_round_trip() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let h = Harness::new();

        for _ in 0..40 {
            let tree = random_tree(&mut rng, 64);
            let batch_type = BatchType::ALL[rng.gen_range(0..4)];
            let id = h.publish(tree.root(), batch_type, tree.len() as u64);

            for i in 0..tree.len() {
                let proof = tree.proof(i);
                assert!(
                    h.registry.verify_proof(id, &tree.leaf(i), &proof).unwrap(),
                    "leaf {i} of batch {id} failed"
                );
            }
        }
        assert_eq!(h.registry.get_batch_count(), 40);
    }

    #[test]
    fn test_random_tampering_is_rejected() {
        let mut rng = StdRng::seed_from_u64(SEED ^ 1);
        let h = Harness::new();

        for _ in 0..40 {
            let tree = random_tree(&mut rng, 32);
            if tree.len() < 2 {
                continue;
            }
            let id = h.publish(tree.root(), BatchType::Trade, tree.len() as u64);
            let i = rng.gen_range(0..tree.len());
            let proof = tree.proof(i);

            let mut leaf = tree.leaf(i);
            leaf[rng.gen_range(0..32)] ^= 1 << rng.gen_range(0..8);
            assert!(!h.registry.verify_proof(id, &leaf, &proof).unwrap());

            let mut altered = proof.clone();
            let j = rng.gen_range(0..altered.len());
            altered[j][rng.gen_range(0..32)] ^= 0x80;
            assert!(!h.registry.verify_proof(id, &tree.leaf(i), &altered).unwrap());

            let mut truncated = proof.clone();
            truncated.pop();
            assert!(!h
                .registry
                .verify_proof(id, &tree.leaf(i), &truncated)
                .unwrap());

            let mut extended = proof;
            extended.push(rng.gen());
            assert!(!h
                .registry
                .verify_proof(id, &tree.leaf(i), &extended)
                .unwrap());
        }
    }

    #[test]
    fn test_leaf_and_first_sibling_are_interchangeable() {
        let mut rng = StdRng::seed_from_u64(SEED ^ 2);
        let tree = random_tree(&mut rng, 16);
        let h = Harness::new();
        let id = h.publish(tree.root(), BatchType::Yield, tree.len() as u64);

        for i in 0..tree.len() {
            let mut proof = tree.proof(i);
            let Some(first) = proof.first().copied() else {
                continue;
            };
            proof[0] = tree.leaf(i);
            assert!(h.registry.verify_proof(id, &first, &proof).unwrap());
        }
    }
}
