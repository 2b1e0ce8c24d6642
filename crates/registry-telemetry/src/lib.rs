//! # Registry Telemetry
//!
//! Logging and metrics for the proof registry.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registry_telemetry::{init_tracing, register_metrics, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_tracing(&config)?;
//! register_metrics()?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PR_SERVICE_NAME` | `proof-registry` | Service name attached to startup logs |
//! | `PR_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `PR_JSON_LOGS` | `false` | Emit JSON lines instead of human-readable output |

#![warn(missing_docs)]

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    gather_metrics, register_metrics, HistogramTimer, BATCHES_PUBLISHED, BATCHES_REVOKED,
    BATCHES_VERIFIED, PAUSE_TRANSITIONS, PROOF_VERIFICATIONS, PROOF_VERIFY_DURATION,
    REGISTRY, ROLE_CHANGES,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed (bad filter or already set).
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}
