//! # Registry Node
//!
//! Hosts one proof registry over a configurable storage backend.
//!
//! ## Modules
//!
//! - `config/` - `PR_*` environment configuration
//! - `adapters/` - storage backends (memory, snapshot file, RocksDB)
//! - `wiring/` - event bus to metrics and audit log
//! - `node` - assembles storage, registry, bus and recorder
//! - `cli` - subcommands for every registry operation
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (environment, then CLI flags)
//! 2. Initialize tracing and register metrics
//! 3. Open storage; recover or bootstrap the registry
//! 4. Run the command, then flush pending events to the recorder

pub mod adapters;
pub mod cli;
pub mod config;
pub mod node;
pub mod views;
pub mod wiring;

pub use config::{ConfigError, NodeConfig, StorageBackend};
pub use node::{NodeRegistry, RegistryNode};
