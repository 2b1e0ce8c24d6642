//! # Proof Registry Service
//!
//! The registry aggregate. One `RwLock` guards all state: mutations hold
//! the write guard across check, validate, persist, apply and emit, so the
//! event stream order equals the commit order and readers never see a
//! half-applied change.

mod persistence;

use crate::adapters::RoleRegistry;
use crate::domain::entities::{Batch, PublishBatchRequest, RegistryStats};
use crate::domain::errors::RegistryError;
use crate::domain::invariants::{invariant_nonzero_address, invariant_page_limit, validate_publish};
use crate::domain::merkle;
use crate::domain::store::BatchStore;
use crate::domain::value_objects::MAX_PAGE_LIMIT;
use crate::ports::inbound::ProofRegistryApi;
use crate::ports::outbound::{
    AuthorityProvider, BatchOperation, KeyValueStore, RoleAdministration, TimeSource,
};
use parking_lot::RwLock;
use shared_bus::{EventPublisher, RegistryEvent};
use shared_types::entities::{short_hex, Address, BatchId, BatchType, Hash, Role};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

struct RegistryState<KV> {
    kv: KV,
    batches: BatchStore,
    roles: Box<dyn RoleAdministration>,
    paused: bool,
}

/// The proof registry.
pub struct ProofRegistryService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    state: RwLock<RegistryState<KV>>,
    clock: TS,
    events: Arc<dyn EventPublisher>,
}

impl<KV, TS> ProofRegistryService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Open a registry on `kv` with the default role backend.
    ///
    /// An empty store is bootstrapped: `admin` gets ADMIN and PAUSER,
    /// `publisher` gets PUBLISHER. A store that already holds registry
    /// state is recovered as-is and the bootstrap identities are only
    /// checked for being non-null.
    pub fn open(
        kv: KV,
        clock: TS,
        events: Arc<dyn EventPublisher>,
        admin: Address,
        publisher: Address,
    ) -> Result<Self, RegistryError> {
        Self::open_with(
            kv,
            clock,
            events,
            admin,
            publisher,
            Box::new(RoleRegistry::new()),
        )
    }

    /// Open with an explicit role backend.
    ///
    /// `roles` should start empty; persisted grants are replayed into it.
    pub fn open_with(
        kv: KV,
        clock: TS,
        events: Arc<dyn EventPublisher>,
        admin: Address,
        publisher: Address,
        roles: Box<dyn RoleAdministration>,
    ) -> Result<Self, RegistryError> {
        invariant_nonzero_address(&admin)?;
        invariant_nonzero_address(&publisher)?;
        Self::open_inner(kv, clock, events, Some((admin, publisher)), roles)
    }

    /// Reopen a store that already holds registry state.
    ///
    /// Fails with `InvalidAddress` on an empty store, since there are no
    /// identities to bootstrap it with.
    pub fn open_existing(
        kv: KV,
        clock: TS,
        events: Arc<dyn EventPublisher>,
    ) -> Result<Self, RegistryError> {
        Self::open_inner(kv, clock, events, None, Box::new(RoleRegistry::new()))
    }

    fn open_inner(
        mut kv: KV,
        clock: TS,
        events: Arc<dyn EventPublisher>,
        bootstrap: Option<(Address, Address)>,
        mut roles: Box<dyn RoleAdministration>,
    ) -> Result<Self, RegistryError> {
        let (batches, paused) = match (persistence::load(&kv)?, bootstrap) {
            (Some(recovered), _) => {
                for (role, account) in recovered.grants {
                    roles.grant(role, account);
                }
                info!(
                    next_batch_id = recovered.batches.next_batch_id(),
                    live = recovered.batches.live_count(),
                    paused = recovered.paused,
                    "[registry] Recovered persisted state"
                );
                (recovered.batches, recovered.paused)
            }
            (None, Some((admin, publisher))) => {
                kv.atomic_batch_write(persistence::bootstrap_ops(&admin, &publisher))?;
                let grants = [
                    (Role::Admin, admin),
                    (Role::Pauser, admin),
                    (Role::Publisher, publisher),
                ];
                for (role, account) in grants {
                    roles.grant(role, account);
                }
                info!(
                    admin = %short_hex(&admin),
                    publisher = %short_hex(&publisher),
                    "[registry] Bootstrapped new registry"
                );
                for (role, account) in grants {
                    events.publish(RegistryEvent::RoleGranted {
                        role,
                        account,
                        sender: admin,
                    });
                }
                (BatchStore::new(), false)
            }
            (None, None) => return Err(RegistryError::InvalidAddress),
        };

        Ok(Self {
            state: RwLock::new(RegistryState {
                kv,
                batches,
                roles,
                paused,
            }),
            clock,
            events,
        })
    }

    /// True if `kv` already holds registry state.
    pub fn is_initialized(kv: &KV) -> Result<bool, RegistryError> {
        Ok(kv.get(persistence::NEXT_BATCH_ID_KEY)?.is_some())
    }

    /// Tear down the service and hand back its store.
    pub fn into_store(self) -> KV {
        self.state.into_inner().kv
    }

    fn require_role<A>(authority: &A, role: Role, caller: &Address) -> Result<(), RegistryError>
    where
        A: AuthorityProvider + ?Sized,
    {
        if authority.has_role(role, caller) {
            return Ok(());
        }
        warn!(
            caller = %short_hex(caller),
            role = %role,
            "[registry] Unauthorized call rejected"
        );
        Err(RegistryError::Unauthorized {
            caller: *caller,
            role,
        })
    }

    fn commit(kv: &mut KV, ops: Vec<BatchOperation>) -> Result<(), RegistryError> {
        kv.atomic_batch_write(ops).map_err(|e| {
            error!(error = %e, "[registry] Store write failed, nothing applied");
            RegistryError::from(e)
        })
    }

    fn set_paused(&self, caller: Address, paused: bool) -> Result<(), RegistryError> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        Self::require_role(&*state.roles, Role::Pauser, &caller)?;
        match (state.paused, paused) {
            (true, true) => return Err(RegistryError::AlreadyPaused),
            (false, false) => return Err(RegistryError::NotPaused),
            _ => {}
        }

        Self::commit(&mut state.kv, persistence::pause_ops(paused))?;
        state.paused = paused;

        info!(account = %short_hex(&caller), paused, "[registry] Pause state changed");
        let event = if paused {
            RegistryEvent::Paused { account: caller }
        } else {
            RegistryEvent::Unpaused { account: caller }
        };
        self.events.publish(event);
        Ok(())
    }

    fn drop_role(
        &self,
        state: &mut RegistryState<KV>,
        sender: Address,
        role: Role,
        account: Address,
    ) -> Result<bool, RegistryError> {
        if !state.roles.has_role(role, &account) {
            return Ok(false);
        }
        Self::commit(&mut state.kv, persistence::revoke_role_ops(role, &account))?;
        state.roles.revoke(role, &account);

        info!(role = %role, account = %short_hex(&account), "[registry] Role revoked");
        self.events.publish(RegistryEvent::RoleRevoked {
            role,
            account,
            sender,
        });
        Ok(true)
    }
}

impl<KV, TS> ProofRegistryApi for ProofRegistryService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    fn publish_batch(
        &self,
        caller: Address,
        request: PublishBatchRequest,
    ) -> Result<BatchId, RegistryError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        Self::require_role(&*state.roles, Role::Publisher, &caller)?;
        if state.paused {
            debug!("[registry] Publish rejected: paused");
            return Err(RegistryError::ContractPaused);
        }

        let now = self.clock.now();
        let batch_type = validate_publish(&request, now).inspect_err(|e| {
            debug!(error = %e, "[registry] Publish rejected");
        })?;
        if let Some(existing) = state.batches.id_by_root(&request.root) {
            debug!(existing, "[registry] Publish rejected: duplicate root");
            return Err(RegistryError::DuplicateRoot {
                root: request.root,
                existing,
            });
        }

        let batch = Batch {
            id: state.batches.next_batch_id(),
            merkle_root: request.root,
            batch_type,
            start_timestamp: request.start_timestamp,
            end_timestamp: request.end_timestamp,
            uri: request.uri,
            publisher: caller,
            entry_count: request.entry_count,
            verified: false,
            created_at: now,
        };
        let seq = state.batches.next_type_seq(batch_type);
        Self::commit(&mut state.kv, persistence::publish_ops(&batch, seq)?)?;

        let id = batch.id;
        let event = RegistryEvent::BatchPublished {
            batch_id: id,
            merkle_root: batch.merkle_root,
            batch_type,
            start_timestamp: batch.start_timestamp,
            end_timestamp: batch.end_timestamp,
            uri: batch.uri.clone(),
            entry_count: batch.entry_count,
            publisher: caller,
            created_at: batch.created_at,
        };
        state.batches.insert(batch);

        info!(
            batch_id = id,
            batch_type = %batch_type,
            root = %short_hex(&request.root),
            entries = request.entry_count,
            "[registry] Batch published"
        );
        self.events.publish(event);
        Ok(id)
    }

    fn verify_batch(&self, caller: Address, id: BatchId) -> Result<(), RegistryError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        Self::require_role(&*state.roles, Role::Publisher, &caller)?;
        let batch = state
            .batches
            .get(id)
            .ok_or(RegistryError::InvalidBatchId(id))?;
        if batch.verified {
            return Err(RegistryError::AlreadyVerified(id));
        }
        let root = batch.merkle_root;

        Self::commit(&mut state.kv, persistence::verify_ops(batch)?)?;
        state.batches.mark_verified(id);

        info!(batch_id = id, "[registry] Batch verified");
        self.events.publish(RegistryEvent::BatchVerified {
            batch_id: id,
            merkle_root: root,
        });
        Ok(())
    }

    fn revoke_batch(
        &self,
        caller: Address,
        id: BatchId,
        reason: &str,
    ) -> Result<(), RegistryError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        Self::require_role(&*state.roles, Role::Admin, &caller)?;
        let batch = state
            .batches
            .get(id)
            .ok_or(RegistryError::InvalidBatchId(id))?;
        let root = batch.merkle_root;

        Self::commit(&mut state.kv, persistence::revoke_ops(batch))?;
        state.batches.remove(id);

        info!(batch_id = id, reason, "[registry] Batch revoked");
        self.events.publish(RegistryEvent::BatchRevoked {
            batch_id: id,
            merkle_root: root,
            reason: reason.to_string(),
        });
        Ok(())
    }

    fn pause(&self, caller: Address) -> Result<(), RegistryError> {
        self.set_paused(caller, true)
    }

    fn unpause(&self, caller: Address) -> Result<(), RegistryError> {
        self.set_paused(caller, false)
    }

    fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    fn grant_role(
        &self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<bool, RegistryError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        Self::require_role(&*state.roles, Role::Admin, &caller)?;
        invariant_nonzero_address(&account)?;
        if state.roles.has_role(role, &account) {
            return Ok(false);
        }

        Self::commit(&mut state.kv, persistence::grant_ops(role, &account))?;
        state.roles.grant(role, account);

        info!(role = %role, account = %short_hex(&account), "[registry] Role granted");
        self.events.publish(RegistryEvent::RoleGranted {
            role,
            account,
            sender: caller,
        });
        Ok(true)
    }

    fn revoke_role(
        &self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<bool, RegistryError> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        Self::require_role(&*state.roles, Role::Admin, &caller)?;
        self.drop_role(state, caller, role, account)
    }

    fn renounce_role(&self, caller: Address, role: Role) -> Result<bool, RegistryError> {
        invariant_nonzero_address(&caller)?;
        let mut guard = self.state.write();
        self.drop_role(&mut guard, caller, role, caller)
    }

    fn has_role(&self, role: Role, account: &Address) -> bool {
        self.state.read().roles.has_role(role, account)
    }

    fn role_members(&self, role: Role) -> Vec<Address> {
        self.state.read().roles.members(role)
    }

    fn get_batch(&self, id: BatchId) -> Result<Batch, RegistryError> {
        self.state
            .read()
            .batches
            .get(id)
            .cloned()
            .ok_or(RegistryError::InvalidBatchId(id))
    }

    fn get_batch_id_by_root(&self, root: &Hash) -> Option<BatchId> {
        self.state.read().batches.id_by_root(root)
    }

    fn get_batch_count(&self) -> u64 {
        self.state.read().batches.total_published()
    }

    fn get_batch_count_by_type(&self, batch_type: BatchType) -> u64 {
        self.state.read().batches.count_by_type(batch_type)
    }

    fn get_batches_by_type(
        &self,
        batch_type: BatchType,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<BatchId>, RegistryError> {
        invariant_page_limit(limit, MAX_PAGE_LIMIT)?;
        Ok(self
            .state
            .read()
            .batches
            .page_by_type(batch_type, offset, limit))
    }

    fn latest_batches(&self, limit: usize) -> Result<Vec<Batch>, RegistryError> {
        invariant_page_limit(limit, MAX_PAGE_LIMIT)?;
        Ok(self.state.read().batches.latest(limit))
    }

    fn next_batch_id(&self) -> BatchId {
        self.state.read().batches.next_batch_id()
    }

    fn stats(&self) -> RegistryStats {
        let state = self.state.read();
        let total = state.batches.total_published();
        let live = state.batches.live_count();
        RegistryStats {
            total_published: total,
            live_batches: live,
            verified_batches: state.batches.verified_count(),
            revoked_batches: total - live,
            paused: state.paused,
            per_type_index_len: state.batches.type_index_lens(),
        }
    }

    fn verify_proof(
        &self,
        id: BatchId,
        leaf: &Hash,
        proof: &[Hash],
    ) -> Result<bool, RegistryError> {
        let root = self
            .state
            .read()
            .batches
            .get(id)
            .map(|b| b.merkle_root)
            .ok_or(RegistryError::InvalidBatchId(id))?;
        let valid = merkle::verify(proof, &root, leaf);
        debug!(
            batch_id = id,
            leaf = %short_hex(leaf),
            depth = proof.len(),
            valid,
            "[registry] Proof checked"
        );
        Ok(valid)
    }

    fn verify_proof_for_root(&self, root: &Hash, leaf: &Hash, proof: &[Hash]) -> bool {
        merkle::verify(proof, root, leaf)
    }
}
