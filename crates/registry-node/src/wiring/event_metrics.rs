//! Translates registry events into metrics and audit log lines.

use registry_telemetry::{
    BATCHES_PUBLISHED, BATCHES_REVOKED, BATCHES_VERIFIED, PAUSE_TRANSITIONS, ROLE_CHANGES,
};
use shared_bus::{EventFilter, InMemoryEventBus, RegistryEvent, Subscription};
use shared_types::entities::{short_hex, to_hex};
use tracing::{info, warn};

/// Update counters and write one audit line for `event`.
pub fn record_event(event: &RegistryEvent) {
    match event {
        RegistryEvent::BatchPublished {
            batch_id,
            merkle_root,
            batch_type,
            entry_count,
            publisher,
            ..
        } => {
            BATCHES_PUBLISHED.with_label_values(&[batch_type.name()]).inc();
            info!(
                target: "registry_audit",
                event = event.name(),
                batch_id,
                root = %to_hex(merkle_root),
                batch_type = %batch_type,
                entry_count,
                publisher = %short_hex(publisher)
            );
        }
        RegistryEvent::BatchVerified {
            batch_id,
            merkle_root,
        } => {
            BATCHES_VERIFIED.inc();
            info!(
                target: "registry_audit",
                event = event.name(),
                batch_id,
                root = %to_hex(merkle_root)
            );
        }
        RegistryEvent::BatchRevoked {
            batch_id,
            merkle_root,
            reason,
        } => {
            BATCHES_REVOKED.inc();
            info!(
                target: "registry_audit",
                event = event.name(),
                batch_id,
                root = %to_hex(merkle_root),
                reason = %reason
            );
        }
        RegistryEvent::RoleGranted {
            role,
            account,
            sender,
        }
        | RegistryEvent::RoleRevoked {
            role,
            account,
            sender,
        } => {
            let change = if matches!(event, RegistryEvent::RoleGranted { .. }) {
                "granted"
            } else {
                "revoked"
            };
            ROLE_CHANGES.with_label_values(&[change]).inc();
            info!(
                target: "registry_audit",
                event = event.name(),
                role = %role,
                account = %short_hex(account),
                sender = %short_hex(sender)
            );
        }
        RegistryEvent::Paused { account } | RegistryEvent::Unpaused { account } => {
            let state = if matches!(event, RegistryEvent::Paused { .. }) {
                "paused"
            } else {
                "unpaused"
            };
            PAUSE_TRANSITIONS.with_label_values(&[state]).inc();
            info!(
                target: "registry_audit",
                event = event.name(),
                account = %short_hex(account)
            );
        }
    }
}

/// Bus subscriber that feeds every event through [`record_event`].
pub struct EventMetricsRecorder {
    subscription: Subscription,
    recorded: u64,
    reported_missed: u64,
}

impl EventMetricsRecorder {
    /// Subscribe to every topic on `bus`.
    pub fn attach(bus: &InMemoryEventBus) -> Self {
        Self {
            subscription: bus.subscribe(EventFilter::all()),
            recorded: 0,
            reported_missed: 0,
        }
    }

    /// Record every pending event. Returns how many were recorded.
    pub fn drain(&mut self) -> usize {
        let events = self.subscription.drain();
        for event in &events {
            record_event(event);
        }
        self.recorded += events.len() as u64;
        self.report_lag();
        events.len()
    }

    /// Record events until the bus is dropped.
    pub async fn run(mut self) -> u64 {
        while let Some(event) = self.subscription.recv().await {
            record_event(&event);
            self.recorded += 1;
            self.report_lag();
        }
        self.recorded
    }

    /// Events recorded so far.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    fn report_lag(&mut self) {
        let missed = self.subscription.missed();
        if missed > self.reported_missed {
            warn!(
                missed = missed - self.reported_missed,
                "[wiring] Metrics recorder lagged, events were not counted"
            );
            self.reported_missed = missed;
        }
    }
}
