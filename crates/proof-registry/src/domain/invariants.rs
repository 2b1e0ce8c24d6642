//! # Domain Invariants
//!
//! Validation rules applied before any state change. `validate_publish`
//! checks in a fixed order and stops at the first violation:
//! root, batch type, timestamp range, end not in the future, entry count.
//! The duplicate-root check needs the batch store and runs in the service.

use super::entities::PublishBatchRequest;
use super::errors::RegistryError;
use shared_types::entities::{is_zero_address, is_zero_hash, Address, BatchType, Hash, Timestamp};

/// Root must not be the zero hash.
pub fn invariant_nonzero_root(root: &Hash) -> Result<(), RegistryError> {
    if is_zero_hash(root) {
        return Err(RegistryError::InvalidRoot);
    }
    Ok(())
}

/// Batch type code must name a known type.
pub fn invariant_known_batch_type(code: u8) -> Result<BatchType, RegistryError> {
    BatchType::from_code(code).ok_or(RegistryError::InvalidBatchType(code))
}

/// `start < end`.
pub fn invariant_timestamp_range(start: Timestamp, end: Timestamp) -> Result<(), RegistryError> {
    if start >= end {
        return Err(RegistryError::InvalidTimestampRange { start, end });
    }
    Ok(())
}

/// `end <= now`.
pub fn invariant_end_not_future(end: Timestamp, now: Timestamp) -> Result<(), RegistryError> {
    if end > now {
        return Err(RegistryError::FutureEndTimestamp { end, now });
    }
    Ok(())
}

/// At least one record.
pub fn invariant_entry_count(entry_count: u64) -> Result<(), RegistryError> {
    if entry_count == 0 {
        return Err(RegistryError::InvalidEntryCount);
    }
    Ok(())
}

/// `1 <= limit <= max`.
pub fn invariant_page_limit(limit: usize, max: usize) -> Result<(), RegistryError> {
    if limit == 0 || limit > max {
        return Err(RegistryError::InvalidLimit { limit, max });
    }
    Ok(())
}

/// Identity must not be the null address.
pub fn invariant_nonzero_address(address: &Address) -> Result<(), RegistryError> {
    if is_zero_address(address) {
        return Err(RegistryError::InvalidAddress);
    }
    Ok(())
}

/// Field checks for a publish request, in order. Returns the decoded type.
pub fn validate_publish(
    request: &PublishBatchRequest,
    now: Timestamp,
) -> Result<BatchType, RegistryError> {
    invariant_nonzero_root(&request.root)?;
    let batch_type = invariant_known_batch_type(request.batch_type)?;
    invariant_timestamp_range(request.start_timestamp, request.end_timestamp)?;
    invariant_end_not_future(request.end_timestamp, now)?;
    invariant_entry_count(request.entry_count)?;
    Ok(batch_type)
}
