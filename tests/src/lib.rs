//! # Proof Registry Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Reference Merkle tree builder and registry harness
//! ├── integration/      # End-to-end flows, randomized trees, persistence
//! └── adversarial/      # Authorization, pause gating, lifecycle abuse
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p pr-tests
//!
//! # By category
//! cargo test -p pr-tests integration::
//! cargo test -p pr-tests adversarial::
//!
//! # Persistence against RocksDB too
//! cargo test -p pr-tests --features rocksdb
//!
//! # Benchmarks
//! cargo bench -p pr-tests
//! ```

pub mod adversarial;
pub mod fixtures;
pub mod integration;
