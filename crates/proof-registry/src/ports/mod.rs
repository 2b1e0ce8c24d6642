//! Ports layer: the registry's API and the dependencies it needs.

pub mod inbound;
pub mod outbound;

pub use inbound::ProofRegistryApi;
pub use outbound::{
    AuthorityProvider, BatchOperation, KeyValueStore, RoleAdministration, TimeSource,
};
