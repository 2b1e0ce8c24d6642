//! # Adversarial Tests
//!
//! Callers without the right role, malformed input crafted to probe check
//! ordering, and lifecycle abuse.
//!
//! ```text
//! adversarial/
//! ├── authorization.rs   # role checks run before anything else
//! └── lifecycle.rs       # pause gating, double verify, replayed roots
//! ```

pub mod lifecycle;
