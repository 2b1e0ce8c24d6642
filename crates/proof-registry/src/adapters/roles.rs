//! In-memory role backend.

use crate::ports::outbound::{AuthorityProvider, RoleAdministration};
use shared_types::entities::{Address, Role};
use std::collections::{BTreeSet, HashMap};

/// Role membership held in memory.
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    members: HashMap<Role, BTreeSet<Address>>,
}

impl RoleRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthorityProvider for RoleRegistry {
    fn has_role(&self, role: Role, holder: &Address) -> bool {
        self.members
            .get(&role)
            .is_some_and(|holders| holders.contains(holder))
    }
}

impl RoleAdministration for RoleRegistry {
    fn grant(&mut self, role: Role, holder: Address) -> bool {
        self.members.entry(role).or_default().insert(holder)
    }

    fn revoke(&mut self, role: Role, holder: &Address) -> bool {
        self.members
            .get_mut(&role)
            .is_some_and(|holders| holders.remove(holder))
    }

    fn members(&self, role: Role) -> Vec<Address> {
        self.members
            .get(&role)
            .map(|holders| holders.iter().copied().collect())
            .unwrap_or_default()
    }
}
