//! Prometheus metrics for the proof registry.
//!
//! All metrics follow the naming convention: `pr_<subject>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BATCH LIFECYCLE
    // =========================================================================

    /// Batches published, by type
    pub static ref BATCHES_PUBLISHED: IntCounterVec = IntCounterVec::new(
        Opts::new("pr_batches_published_total", "Total number of batches published"),
        &["batch_type"]
    ).expect("metric creation failed");

    /// Batches marked verified
    pub static ref BATCHES_VERIFIED: IntCounter = IntCounter::new(
        "pr_batches_verified_total",
        "Total number of batches marked verified"
    ).expect("metric creation failed");

    /// Batches revoked
    pub static ref BATCHES_REVOKED: IntCounter = IntCounter::new(
        "pr_batches_revoked_total",
        "Total number of batches revoked"
    ).expect("metric creation failed");

    // =========================================================================
    // ACCESS CONTROL AND PAUSE
    // =========================================================================

    /// Role changes
    pub static ref ROLE_CHANGES: IntCounterVec = IntCounterVec::new(
        Opts::new("pr_role_changes_total", "Total number of role grants and revocations"),
        &["change"]  // granted / revoked
    ).expect("metric creation failed");

    /// Pause transitions
    pub static ref PAUSE_TRANSITIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("pr_pause_transitions_total", "Total number of pause state changes"),
        &["state"]  // paused / unpaused
    ).expect("metric creation failed");

    // =========================================================================
    // PROOFS
    // =========================================================================

    /// Proof checks, by result
    pub static ref PROOF_VERIFICATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("pr_proof_verifications_total", "Total number of inclusion proof checks"),
        &["result"]  // valid / invalid / error
    ).expect("metric creation failed");

    /// Proof check duration
    pub static ref PROOF_VERIFY_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "pr_proof_verify_duration_seconds",
            "Time spent verifying inclusion proofs"
        ).buckets(exponential_buckets(0.000_001, 2.0, 16).expect("static bucket layout"))
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(BATCHES_PUBLISHED.clone()),
        Box::new(BATCHES_VERIFIED.clone()),
        Box::new(BATCHES_REVOKED.clone()),
        Box::new(ROLE_CHANGES.clone()),
        Box::new(PAUSE_TRANSITIONS.clone()),
        Box::new(PROOF_VERIFICATIONS.clone()),
        Box::new(PROOF_VERIFY_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
