//! # Event Wiring
//!
//! Connects the registry's event bus to the node's observers.
//!
//! ```text
//! ProofRegistryService ──publish──▶ InMemoryEventBus ──▶ EventMetricsRecorder
//!                                                          ├─ Prometheus counters
//!                                                          └─ audit log lines
//! ```

mod event_metrics;

pub use event_metrics::{record_event, EventMetricsRecorder};
