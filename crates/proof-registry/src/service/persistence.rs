//! # Persisted Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `meta:next_batch_id` | u64 |
//! | `meta:paused` | `[0]` or `[1]` |
//! | `batch:<id u64>` | bincode(`Batch`) |
//! | `root:<hash 32>` | id u64 |
//! | `tidx:<type u8>:<seq u64>` | id u64 |
//! | `role:<role id 32>:<address 20>` | `[1]` |
//!
//! Integers are big-endian so that prefix scans return keys in numeric
//! order. Each registry mutation maps to exactly one atomic batch built
//! here.

use crate::domain::entities::Batch;
use crate::domain::errors::RegistryError;
use crate::domain::store::BatchStore;
use crate::domain::value_objects::{role_from_id, role_id};
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use shared_types::entities::{Address, BatchId, BatchType, Hash, Role};

pub(crate) const NEXT_BATCH_ID_KEY: &[u8] = b"meta:next_batch_id";
pub(crate) const PAUSED_KEY: &[u8] = b"meta:paused";
pub(crate) const BATCH_PREFIX: &[u8] = b"batch:";
pub(crate) const ROOT_PREFIX: &[u8] = b"root:";
pub(crate) const TYPE_INDEX_PREFIX: &[u8] = b"tidx:";
pub(crate) const ROLE_PREFIX: &[u8] = b"role:";

const PRESENT: [u8; 1] = [1];

// =============================================================================
// KEYS
// =============================================================================

pub(crate) fn batch_key(id: BatchId) -> Vec<u8> {
    [BATCH_PREFIX, &id.to_be_bytes()].concat()
}

pub(crate) fn root_key(root: &Hash) -> Vec<u8> {
    [ROOT_PREFIX, root.as_slice()].concat()
}

pub(crate) fn type_index_key(batch_type: BatchType, seq: u64) -> Vec<u8> {
    [TYPE_INDEX_PREFIX, &[batch_type.code(), b':'], &seq.to_be_bytes()].concat()
}

pub(crate) fn role_key(role: Role, account: &Address) -> Vec<u8> {
    [ROLE_PREFIX, role_id(role).as_slice(), b":", account.as_slice()].concat()
}

fn parse_type_index_key(key: &[u8]) -> Option<(u8, u64)> {
    let rest = key.strip_prefix(TYPE_INDEX_PREFIX)?;
    let (&code, rest) = rest.split_first()?;
    let seq = rest.strip_prefix(b":")?;
    Some((code, u64::from_be_bytes(seq.try_into().ok()?)))
}

fn parse_role_key(key: &[u8]) -> Option<(Hash, Address)> {
    let rest = key.strip_prefix(ROLE_PREFIX)?;
    if rest.len() != 32 + 1 + 20 || rest[32] != b':' {
        return None;
    }
    let id: Hash = rest[..32].try_into().ok()?;
    let account: Address = rest[33..].try_into().ok()?;
    Some((id, account))
}

// =============================================================================
// VALUES
// =============================================================================

fn encode_u64(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

fn decode_u64(bytes: &[u8], what: &str) -> Result<u64, RegistryError> {
    let raw: [u8; 8] = bytes
        .try_into()
        .map_err(|_| RegistryError::Corrupted(format!("{what}: expected 8 bytes, got {}", bytes.len())))?;
    Ok(u64::from_be_bytes(raw))
}

fn encode_batch(batch: &Batch) -> Result<Vec<u8>, RegistryError> {
    bincode::serialize(batch)
        .map_err(|e| RegistryError::Storage(format!("encode batch {}: {e}", batch.id)))
}

fn decode_batch(bytes: &[u8]) -> Result<Batch, RegistryError> {
    bincode::deserialize(bytes).map_err(|e| RegistryError::Corrupted(format!("batch record: {e}")))
}

// =============================================================================
// MUTATION BATCHES
// =============================================================================

pub(crate) fn bootstrap_ops(admin: &Address, publisher: &Address) -> Vec<BatchOperation> {
    vec![
        BatchOperation::put(NEXT_BATCH_ID_KEY, encode_u64(1)),
        BatchOperation::put(PAUSED_KEY, vec![0]),
        BatchOperation::put(role_key(Role::Admin, admin), PRESENT),
        BatchOperation::put(role_key(Role::Pauser, admin), PRESENT),
        BatchOperation::put(role_key(Role::Publisher, publisher), PRESENT),
    ]
}

/// `seq` is the position the id takes in its type list.
pub(crate) fn publish_ops(batch: &Batch, seq: u64) -> Result<Vec<BatchOperation>, RegistryError> {
    Ok(vec![
        BatchOperation::put(NEXT_BATCH_ID_KEY, encode_u64(batch.id + 1)),
        BatchOperation::put(batch_key(batch.id), encode_batch(batch)?),
        BatchOperation::put(root_key(&batch.merkle_root), encode_u64(batch.id)),
        BatchOperation::put(type_index_key(batch.batch_type, seq), encode_u64(batch.id)),
    ])
}

/// Rewrite the record with `verified` set.
pub(crate) fn verify_ops(batch: &Batch) -> Result<Vec<BatchOperation>, RegistryError> {
    let mut updated = batch.clone();
    updated.verified = true;
    Ok(vec![BatchOperation::put(batch_key(batch.id), encode_batch(&updated)?)])
}

pub(crate) fn revoke_ops(batch: &Batch) -> Vec<BatchOperation> {
    vec![
        BatchOperation::delete(batch_key(batch.id)),
        BatchOperation::delete(root_key(&batch.merkle_root)),
    ]
}

pub(crate) fn pause_ops(paused: bool) -> Vec<BatchOperation> {
    vec![BatchOperation::put(PAUSED_KEY, vec![u8::from(paused)])]
}

pub(crate) fn grant_ops(role: Role, account: &Address) -> Vec<BatchOperation> {
    vec![BatchOperation::put(role_key(role, account), PRESENT)]
}

pub(crate) fn revoke_role_ops(role: Role, account: &Address) -> Vec<BatchOperation> {
    vec![BatchOperation::delete(role_key(role, account))]
}

// =============================================================================
// RECOVERY
// =============================================================================

/// State read back from a non-empty store.
pub(crate) struct Recovered {
    pub batches: BatchStore,
    pub grants: Vec<(Role, Address)>,
    pub paused: bool,
}

/// Load persisted state. `Ok(None)` means the store was never bootstrapped.
pub(crate) fn load<KV: KeyValueStore>(kv: &KV) -> Result<Option<Recovered>, RegistryError> {
    let Some(raw_next) = kv.get(NEXT_BATCH_ID_KEY)? else {
        return Ok(None);
    };
    let next_batch_id = decode_u64(&raw_next, "next_batch_id")?;
    if next_batch_id == 0 {
        return Err(RegistryError::Corrupted("next_batch_id is zero".into()));
    }

    let paused = match kv.get(PAUSED_KEY)?.as_deref() {
        None | Some([0]) => false,
        Some([1]) => true,
        Some(other) => {
            return Err(RegistryError::Corrupted(format!("paused flag {other:?}")));
        }
    };

    let mut batches = BatchStore::new();
    batches.restore_next_batch_id(next_batch_id);

    for (key, value) in kv.prefix_scan(BATCH_PREFIX)? {
        let batch = decode_batch(&value)?;
        if key != batch_key(batch.id) || batch.id == 0 || batch.id >= next_batch_id {
            return Err(RegistryError::Corrupted(format!("batch {} under wrong key", batch.id)));
        }
        batches.restore_batch(batch);
    }

    let mut roots = 0u64;
    for (key, value) in kv.prefix_scan(ROOT_PREFIX)? {
        let id = decode_u64(&value, "root index")?;
        let consistent = batches
            .get(id)
            .is_some_and(|b| root_key(&b.merkle_root) == key);
        if !consistent {
            return Err(RegistryError::Corrupted(format!("root entry for batch {id}")));
        }
        roots += 1;
    }
    if roots != batches.live_count() {
        return Err(RegistryError::Corrupted(format!(
            "{roots} root entries for {} batches",
            batches.live_count()
        )));
    }

    let mut expected_seq = [0u64; 4];
    for (key, value) in kv.prefix_scan(TYPE_INDEX_PREFIX)? {
        let (code, seq) = parse_type_index_key(&key)
            .ok_or_else(|| RegistryError::Corrupted("malformed type index key".into()))?;
        let batch_type = BatchType::from_code(code)
            .ok_or_else(|| RegistryError::Corrupted(format!("type index code {code}")))?;
        let slot = &mut expected_seq[usize::from(code)];
        if seq != *slot {
            return Err(RegistryError::Corrupted(format!(
                "type index gap for {batch_type}: expected seq {slot}, found {seq}"
            )));
        }
        *slot += 1;

        let id = decode_u64(&value, "type index")?;
        if id == 0 || id >= next_batch_id {
            return Err(RegistryError::Corrupted(format!("type index points at {id}")));
        }
        if batches.get(id).is_some_and(|b| b.batch_type != batch_type) {
            return Err(RegistryError::Corrupted(format!("batch {id} indexed under {batch_type}")));
        }
        batches.restore_type_entry(batch_type, id);
    }

    let mut grants = Vec::new();
    for (key, _) in kv.prefix_scan(ROLE_PREFIX)? {
        let (id, account) = parse_role_key(&key)
            .ok_or_else(|| RegistryError::Corrupted("malformed role key".into()))?;
        let role = role_from_id(&id)
            .ok_or_else(|| RegistryError::Corrupted(format!("unknown role id {}", hex::encode(id))))?;
        grants.push((role, account));
    }

    Ok(Some(Recovered {
        batches,
        grants,
        paused,
    }))
}
