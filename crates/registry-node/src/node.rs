//! # Registry Node
//!
//! Assembles one registry over the configured storage backend, with its
//! event bus and metrics recorder attached.

use crate::adapters::NodeStore;
use crate::config::{NodeConfig, StorageBackend};
use crate::wiring::EventMetricsRecorder;
use anyhow::{bail, Context, Result};
use proof_registry::{ProofRegistryService, RoleRegistry, SystemTimeSource};
use shared_bus::{EventPublisher, InMemoryEventBus};
use shared_types::entities::short_hex;
use std::sync::Arc;
use tracing::info;

/// The registry type hosted by the node.
pub type NodeRegistry = ProofRegistryService<NodeStore, SystemTimeSource>;

/// A running registry with its observers.
pub struct RegistryNode {
    registry: NodeRegistry,
    bus: Arc<InMemoryEventBus>,
    recorder: EventMetricsRecorder,
    backend: StorageBackend,
}

impl RegistryNode {
    /// Open storage and the registry described by `config`.
    ///
    /// A fresh store needs both bootstrap identities. An existing store
    /// opens without them.
    pub fn open(config: &NodeConfig) -> Result<Self> {
        let store = NodeStore::open(config).context("Failed to open storage")?;
        let backend = store.backend();

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.event_capacity));
        let recorder = EventMetricsRecorder::attach(&bus);
        let events: Arc<dyn EventPublisher> = bus.clone();

        let registry = match config.bootstrap_identities() {
            Some((admin, publisher)) => {
                info!(
                    admin = %short_hex(&admin),
                    publisher = %short_hex(&publisher),
                    "[node] Opening registry with bootstrap identities"
                );
                ProofRegistryService::open_with(
                    store,
                    SystemTimeSource,
                    events,
                    admin,
                    publisher,
                    Box::new(RoleRegistry::new()),
                )
            }
            None => {
                if !NodeRegistry::is_initialized(&store)? {
                    bail!(
                        "{} store holds no registry yet; set PR_ADMIN_ADDRESS and \
                         PR_PUBLISHER_ADDRESS (or --admin and --publisher) to bootstrap it",
                        backend
                    );
                }
                ProofRegistryService::open_existing(
                    store,
                    SystemTimeSource,
                    events,
                )
            }
        }
        .context("Failed to open registry")?;

        info!(storage = %backend, "[node] Registry ready");
        Ok(Self {
            registry,
            bus,
            recorder,
            backend,
        })
    }

    /// The hosted registry.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Backend the registry is stored in.
    pub fn backend(&self) -> StorageBackend {
        self.backend
    }

    /// The event bus, for additional subscribers.
    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// Push pending events through the metrics recorder.
    pub fn flush_events(&mut self) -> usize {
        self.recorder.drain()
    }
}
