//! # Domain Errors
//!
//! Every failure is synchronous, typed and leaves state untouched.
//!
//! | Class | Variants |
//! |-------|----------|
//! | Authorization | `Unauthorized` |
//! | Validation | `InvalidRoot`, `InvalidBatchType`, `InvalidTimestampRange`, `FutureEndTimestamp`, `InvalidEntryCount`, `DuplicateRoot`, `InvalidLimit` |
//! | State | `ContractPaused`, `InvalidBatchId`, `AlreadyVerified`, `AlreadyPaused`, `NotPaused` |
//! | Construction | `InvalidAddress` |
//! | Storage | `Storage`, `Corrupted` |

use serde::{Deserialize, Serialize};
use shared_types::entities::{to_hex, Address, BatchId, Hash, Role, Timestamp};
use thiserror::Error;

/// Registry error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Caller lacks the role the operation requires.
    #[error("Unauthorized: {} is missing {role}", to_hex(.caller))]
    Unauthorized {
        /// Rejected caller.
        caller: Address,
        /// Role that was required.
        role: Role,
    },

    /// Null identity where a real one is required.
    #[error("Invalid address")]
    InvalidAddress,

    /// Publication is paused.
    #[error("Contract paused")]
    ContractPaused,

    /// Root is the zero hash.
    #[error("Invalid root")]
    InvalidRoot,

    /// Batch type code outside the enum.
    #[error("Invalid batch type: {0}")]
    InvalidBatchType(u8),

    /// `start_timestamp` is not strictly before `end_timestamp`.
    #[error("Invalid timestamp range: start={start} end={end}")]
    InvalidTimestampRange {
        /// Requested start.
        start: Timestamp,
        /// Requested end.
        end: Timestamp,
    },

    /// `end_timestamp` lies in the future.
    #[error("End timestamp {end} is in the future (now={now})")]
    FutureEndTimestamp {
        /// Requested end.
        end: Timestamp,
        /// Registry clock.
        now: Timestamp,
    },

    /// Zero records.
    #[error("Invalid entry count")]
    InvalidEntryCount,

    /// Root already anchored by a live batch.
    #[error("Duplicate root {} (batch {existing})", to_hex(.root))]
    DuplicateRoot {
        /// Offending root.
        root: Hash,
        /// Batch currently holding the root.
        existing: BatchId,
    },

    /// Page size of zero or above the maximum.
    #[error("Invalid limit {limit} (allowed 1..={max})")]
    InvalidLimit {
        /// Requested limit.
        limit: usize,
        /// Largest accepted limit.
        max: usize,
    },

    /// Id was never published, is zero, or was revoked.
    #[error("Invalid batch id: {0}")]
    InvalidBatchId(BatchId),

    /// Batch is already verified.
    #[error("Batch {0} already verified")]
    AlreadyVerified(BatchId),

    /// `pause` while paused.
    #[error("Already paused")]
    AlreadyPaused,

    /// `unpause` while active.
    #[error("Not paused")]
    NotPaused,

    /// The store rejected the write. Nothing was applied.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Persisted state could not be decoded.
    #[error("Corrupted state: {0}")]
    Corrupted(String),
}

/// Coarse classification used by hosts to map errors to transport codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Missing role.
    Authorization,
    /// Malformed input; retry after correcting it.
    Validation,
    /// Well-formed input not applicable to the current state.
    State,
    /// Bad bootstrap identities.
    Construction,
    /// Persistence failure.
    Storage,
}

impl RegistryError {
    /// Classification of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Unauthorized { .. } => ErrorClass::Authorization,
            Self::InvalidRoot
            | Self::InvalidBatchType(_)
            | Self::InvalidTimestampRange { .. }
            | Self::FutureEndTimestamp { .. }
            | Self::InvalidEntryCount
            | Self::DuplicateRoot { .. }
            | Self::InvalidLimit { .. } => ErrorClass::Validation,
            Self::ContractPaused
            | Self::InvalidBatchId(_)
            | Self::AlreadyVerified(_)
            | Self::AlreadyPaused
            | Self::NotPaused => ErrorClass::State,
            Self::InvalidAddress => ErrorClass::Construction,
            Self::Storage(_) | Self::Corrupted(_) => ErrorClass::Storage,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::ContractPaused => "CONTRACT_PAUSED",
            Self::InvalidRoot => "INVALID_ROOT",
            Self::InvalidBatchType(_) => "INVALID_BATCH_TYPE",
            Self::InvalidTimestampRange { .. } => "INVALID_TIMESTAMP_RANGE",
            Self::FutureEndTimestamp { .. } => "FUTURE_END_TIMESTAMP",
            Self::InvalidEntryCount => "INVALID_ENTRY_COUNT",
            Self::DuplicateRoot { .. } => "DUPLICATE_ROOT",
            Self::InvalidLimit { .. } => "INVALID_LIMIT",
            Self::InvalidBatchId(_) => "INVALID_BATCH_ID",
            Self::AlreadyVerified(_) => "ALREADY_VERIFIED",
            Self::AlreadyPaused => "ALREADY_PAUSED",
            Self::NotPaused => "NOT_PAUSED",
            Self::Storage(_) => "STORAGE",
            Self::Corrupted(_) => "CORRUPTED",
        }
    }
}

/// Serialisable error payload for hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryErrorPayload {
    /// Error class.
    pub class: ErrorClass,
    /// Stable code, see [`RegistryError::code`].
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&RegistryError> for RegistryErrorPayload {
    fn from(err: &RegistryError) -> Self {
        Self {
            class: err.class(),
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError {
        /// Backend message.
        message: String,
    },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError {
        /// Backend message.
        message: String,
    },
}

impl From<KVStoreError> for RegistryError {
    fn from(err: KVStoreError) -> Self {
        RegistryError::Storage(err.to_string())
    }
}
