//! # Shared Types Crate
//!
//! Primitive identifiers used across the registry workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Hash`, `Address`, `Timestamp` and `BatchId`
//!   are defined once here and re-used by the core, the bus and the node.
//! - **Null identities are values**: the all-zero `Address` and `Hash` are the
//!   "unset" sentinels; callers test for them with [`is_zero_address`] and
//!   [`is_zero_hash`] instead of wrapping everything in `Option`.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
