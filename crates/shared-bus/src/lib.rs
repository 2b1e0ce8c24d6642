//! # Shared Bus - Registry Notification Bus
//!
//! Every state change of the proof registry is announced as a
//! [`RegistryEvent`]. Observers (metrics, audit logs, indexers) subscribe
//! with an [`EventFilter`] and receive the events in emission order.
//!
//! ```text
//! ┌────────────────┐   publish()   ┌──────────────┐  subscribe()  ┌──────────┐
//! │ Proof Registry │ ────────────▶ │  Event Bus   │ ────────────▶ │ Observer │
//! └────────────────┘               └──────────────┘               └──────────┘
//! ```
//!
//! Publishing never blocks. Slow subscribers lag and skip the oldest
//! events rather than applying backpressure to the registry.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, RegistryEvent};
pub use publisher::{EventPublisher, InMemoryEventBus, NullPublisher};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
