//! # Registry Events
//!
//! Notifications emitted by the proof registry after each successful
//! state change. Events are emitted in the order the changes were applied.
//!
//! Together the events carry every field of registry state, so a consumer
//! can rebuild batches, role holders and the pause flag from the stream
//! alone. In JSON, hashes and addresses are `0x` hex strings.

use serde::{Deserialize, Serialize};
use shared_types::entities::{hex_bytes, Address, BatchId, BatchType, Hash, Role, Timestamp};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    // =========================================================================
    // BATCH LIFECYCLE
    // =========================================================================
    /// A new batch root was anchored.
    BatchPublished {
        /// Assigned batch id.
        batch_id: BatchId,
        /// Merkle root of the batch.
        #[serde(with = "hex_bytes")]
        merkle_root: Hash,
        /// Batch category.
        batch_type: BatchType,
        /// Start of the covered period.
        start_timestamp: Timestamp,
        /// End of the covered period.
        end_timestamp: Timestamp,
        /// Location of the full data set.
        uri: String,
        /// Number of records in the batch.
        entry_count: u64,
        /// Account that published the batch.
        #[serde(with = "hex_bytes")]
        publisher: Address,
        /// Registry time at which the batch was anchored.
        created_at: Timestamp,
    },

    /// A batch was marked as verified.
    BatchVerified {
        /// Batch id.
        batch_id: BatchId,
        /// Root of the verified batch.
        #[serde(with = "hex_bytes")]
        merkle_root: Hash,
    },

    /// A batch was revoked and its records removed.
    BatchRevoked {
        /// Batch id.
        batch_id: BatchId,
        /// Root that was released by the revocation.
        #[serde(with = "hex_bytes")]
        merkle_root: Hash,
        /// Free-text reason given by the admin.
        reason: String,
    },

    // =========================================================================
    // ACCESS CONTROL
    // =========================================================================
    /// An account gained a role.
    RoleGranted {
        /// Granted role.
        role: Role,
        /// Account that received the role.
        #[serde(with = "hex_bytes")]
        account: Address,
        /// Admin that performed the grant.
        #[serde(with = "hex_bytes")]
        sender: Address,
    },

    /// An account lost a role.
    RoleRevoked {
        /// Revoked role.
        role: Role,
        /// Account that lost the role.
        #[serde(with = "hex_bytes")]
        account: Address,
        /// Account that performed the revocation.
        #[serde(with = "hex_bytes")]
        sender: Address,
    },

    // =========================================================================
    // PAUSE STATE
    // =========================================================================
    /// Publication was paused.
    Paused {
        /// Pauser that paused the registry.
        #[serde(with = "hex_bytes")]
        account: Address,
    },

    /// Publication was resumed.
    Unpaused {
        /// Pauser that unpaused the registry.
        #[serde(with = "hex_bytes")]
        account: Address,
    },
}

impl RegistryEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::BatchPublished { .. } | Self::BatchVerified { .. } | Self::BatchRevoked { .. } => {
                EventTopic::Batches
            }
            Self::RoleGranted { .. } | Self::RoleRevoked { .. } => EventTopic::Roles,
            Self::Paused { .. } | Self::Unpaused { .. } => EventTopic::Pause,
        }
    }

    /// Short event name, used as a label in logs and metrics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::BatchPublished { .. } => "BatchPublished",
            Self::BatchVerified { .. } => "BatchVerified",
            Self::BatchRevoked { .. } => "BatchRevoked",
            Self::RoleGranted { .. } => "RoleGranted",
            Self::RoleRevoked { .. } => "RoleRevoked",
            Self::Paused { .. } => "Paused",
            Self::Unpaused { .. } => "Unpaused",
        }
    }

    /// Batch the event refers to, if any.
    #[must_use]
    pub fn batch_id(&self) -> Option<BatchId> {
        match self {
            Self::BatchPublished { batch_id, .. }
            | Self::BatchVerified { batch_id, .. }
            | Self::BatchRevoked { batch_id, .. } => Some(*batch_id),
            _ => None,
        }
    }

    /// Encode the event as a single JSON line.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Publish, verify and revoke.
    Batches,
    /// Role grants and revocations.
    Roles,
    /// Pause and unpause.
    Pause,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Batches to include. Empty means every batch; events that carry no
    /// batch id are excluded when this is non-empty.
    pub batch_ids: Vec<BatchId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            batch_ids: Vec::new(),
        }
    }

    /// Create a filter for the lifecycle of specific batches.
    #[must_use]
    pub fn for_batches(batch_ids: Vec<BatchId>) -> Self {
        Self {
            topics: vec![EventTopic::Batches],
            batch_ids,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &RegistryEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let batch_match = self.batch_ids.is_empty()
            || event
                .batch_id()
                .is_some_and(|id| self.batch_ids.contains(&id));

        topic_match && batch_match
    }
}
