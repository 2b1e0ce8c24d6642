//! # Value Objects
//!
//! Role identifiers and fixed registry bounds.

use super::merkle::keccak256;
use shared_types::entities::{Hash, Role};

/// Hard upper bound on the page size of paginated queries.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Stable 32-byte identifier of a role: `keccak256(role name)`.
///
/// Used as the persisted key component and for display.
pub fn role_id(role: Role) -> Hash {
    keccak256(role.name().as_bytes())
}

/// Reverse lookup of [`role_id`].
pub fn role_from_id(id: &Hash) -> Option<Role> {
    Role::ALL.into_iter().find(|role| role_id(*role) == *id)
}
