//! # Proof Registry Benchmarks
//!
//! | Operation | Expected cost |
//! |-----------|---------------|
//! | `verify_proof` | O(proof length) Keccak calls |
//! | `publish_batch` | one atomic store write |
//! | `get_batches_by_type` | O(limit) |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pr_tests::fixtures::{request, Harness, SortedPairTree, PUBLISHER};
use proof_registry::{hash_pair, BatchType, Hash, ProofRegistryApi};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

fn random_leaves(rng: &mut StdRng, count: usize) -> Vec<Hash> {
    (0..count).map(|_| rng.gen()).collect()
}

fn bench_hash_pair(c: &mut Criterion) {
    let a = [0x11; 32];
    let b = [0x22; 32];
    c.bench_function("hash_pair", |bench| {
        bench.iter(|| hash_pair(black_box(&a), black_box(&b)))
    });
}

fn bench_verify_proof(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify_proof");
    group.measurement_time(Duration::from_secs(5));
    let mut rng = StdRng::seed_from_u64(7);
    let h = Harness::new();

    for depth in [1usize, 4, 8, 12, 16, 20] {
        let leaves = random_leaves(&mut rng, 1 << depth);
        let tree = SortedPairTree::from_leaves(leaves);
        let id = h.publish(tree.root(), BatchType::Deposit, tree.len() as u64);
        let index = rng.gen_range(0..tree.len());
        let leaf = tree.leaf(index);
        let proof = tree.proof(index);

        group.throughput(Throughput::Elements(proof.len() as u64));
        group.bench_with_input(BenchmarkId::new("depth", depth), &proof, |bench, proof| {
            bench.iter(|| {
                h.registry
                    .verify_proof(black_box(id), black_box(&leaf), black_box(proof))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_batch");
    group.throughput(Throughput::Elements(1));
    group.bench_function("in_memory", |bench| {
        let h = Harness::new();
        let mut n: u64 = 0;
        bench.iter(|| {
            n += 1;
            let mut root = [0u8; 32];
            root[..8].copy_from_slice(&n.to_be_bytes());
            h.registry
                .publish_batch(PUBLISHER, request(root, BatchType::Trade, 1))
                .unwrap()
        })
    });
    group.finish();
}

fn bench_pagination(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_batches_by_type");
    let h = Harness::new();
    for n in 1..=10_000u32 {
        let mut root = [0u8; 32];
        root[..4].copy_from_slice(&n.to_be_bytes());
        h.publish(root, BatchType::Yield, 1);
    }

    for limit in [1usize, 10, 100] {
        group.bench_with_input(BenchmarkId::new("limit", limit), &limit, |bench, &limit| {
            bench.iter(|| {
                h.registry
                    .get_batches_by_type(BatchType::Yield, black_box(5_000), limit)
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_hash_pair,
    bench_verify_proof,
    bench_publish,
    bench_pagination
);
criterion_main!(benches);
