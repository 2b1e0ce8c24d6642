//! Adapters layer: in-process implementations of the outbound ports.

pub mod clock;
pub mod kv_store;
pub mod roles;

pub use clock::{ManualClock, SystemTimeSource};
pub use kv_store::{FailingKVStore, InMemoryKVStore};
pub use roles::RoleRegistry;
