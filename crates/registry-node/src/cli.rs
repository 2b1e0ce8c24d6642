//! # Command Line Interface
//!
//! Every registry operation as a subcommand. Results print as JSON on
//! stdout; failures print a JSON error payload on stderr and exit non-zero.

use crate::config::{NodeConfig, StorageBackend};
use crate::node::RegistryNode;
use crate::views::{
    hex_list, BatchView, PageView, ProofView, RoleChangeView, RoleView, StatusView,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use proof_registry::{hash_leaf, MerkleProof, ProofRegistryApi, PublishBatchRequest};
use registry_telemetry::{
    gather_metrics, HistogramTimer, PROOF_VERIFICATIONS, PROOF_VERIFY_DURATION,
};
use serde_json::{json, Value};
use shared_types::entities::{
    parse_address, parse_hash, to_hex, Address, BatchId, BatchType, Hash, Role,
};
use std::fmt;
use std::path::PathBuf;

/// Proof registry node.
#[derive(Debug, Parser)]
#[command(name = "registry-node")]
#[command(version, about = "Anchor Merkle roots of data batches and verify record inclusion")]
pub struct Cli {
    /// Data directory (overrides PR_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Keep state in memory only
    #[arg(long, global = true, conflicts_with = "storage")]
    pub in_memory: bool,

    /// Storage backend: memory, file or rocksdb (overrides PR_STORAGE)
    #[arg(long, global = true)]
    pub storage: Option<StorageBackend>,

    /// Initial admin for a fresh store (overrides PR_ADMIN_ADDRESS)
    #[arg(long, global = true, value_parser = parse_address)]
    pub admin: Option<Address>,

    /// Initial publisher for a fresh store (overrides PR_PUBLISHER_ADDRESS)
    #[arg(long, global = true, value_parser = parse_address)]
    pub publisher: Option<Address>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Apply flag overrides on top of an environment-loaded config.
    pub fn apply(&self, config: &mut NodeConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(storage) = self.storage {
            config.storage = storage;
        }
        if self.in_memory {
            config.storage = StorageBackend::Memory;
        }
        if self.admin.is_some() {
            config.admin = self.admin;
        }
        if self.publisher.is_some() {
            config.publisher = self.publisher;
        }
    }
}

/// Registry subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show counters, pause state and storage backend
    Status,

    /// Anchor a new batch root
    Publish {
        /// Publishing account
        #[arg(long, value_parser = parse_address)]
        caller: Address,
        /// Merkle root of the batch
        #[arg(long, value_parser = parse_hash)]
        root: Hash,
        /// DEPOSIT, YIELD, TRADE, WITHDRAW or a numeric code
        #[arg(long, value_parser = parse_batch_type_code)]
        batch_type: u8,
        /// Start of the covered period (unix seconds)
        #[arg(long)]
        start: u64,
        /// End of the covered period (unix seconds)
        #[arg(long)]
        end: u64,
        /// Location of the full data set
        #[arg(long)]
        uri: String,
        /// Number of records in the batch
        #[arg(long)]
        entries: u64,
    },

    /// Mark a batch as verified
    Verify {
        #[arg(long, value_parser = parse_address)]
        caller: Address,
        #[arg(long)]
        id: BatchId,
    },

    /// Revoke a batch and release its root
    Revoke {
        #[arg(long, value_parser = parse_address)]
        caller: Address,
        #[arg(long)]
        id: BatchId,
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// Stop new publications
    Pause {
        #[arg(long, value_parser = parse_address)]
        caller: Address,
    },

    /// Resume publications
    Unpause {
        #[arg(long, value_parser = parse_address)]
        caller: Address,
    },

    /// Grant a role to an account
    GrantRole {
        #[arg(long, value_parser = parse_address)]
        caller: Address,
        #[arg(long)]
        role: Role,
        #[arg(long, value_parser = parse_address)]
        account: Address,
    },

    /// Revoke a role from an account
    RevokeRole {
        #[arg(long, value_parser = parse_address)]
        caller: Address,
        #[arg(long)]
        role: Role,
        #[arg(long, value_parser = parse_address)]
        account: Address,
    },

    /// Give up one of the caller's own roles
    RenounceRole {
        #[arg(long, value_parser = parse_address)]
        caller: Address,
        #[arg(long)]
        role: Role,
    },

    /// Check whether an account holds a role
    HasRole {
        #[arg(long)]
        role: Role,
        #[arg(long, value_parser = parse_address)]
        account: Address,
    },

    /// List the holders of a role
    Members {
        #[arg(long)]
        role: Role,
    },

    /// Show one batch
    Get {
        #[arg(long)]
        id: BatchId,
    },

    /// Look up the batch id registered for a root
    ByRoot {
        #[arg(long, value_parser = parse_hash)]
        root: Hash,
    },

    /// Count batches, overall or in one type index
    Count {
        #[arg(long)]
        batch_type: Option<BatchType>,
    },

    /// Page through a type index, newest first
    List {
        #[arg(long)]
        batch_type: BatchType,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show the most recent live batches
    Latest {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Check an inclusion proof against a batch or a bare root
    Prove {
        /// Batch whose root to check against
        #[arg(long, required_unless_present = "root", conflicts_with = "root")]
        id: Option<BatchId>,
        /// Root to check against without a registry lookup
        #[arg(long, value_parser = parse_hash)]
        root: Option<Hash>,
        /// Leaf hash
        #[arg(long, value_parser = parse_hash)]
        leaf: Hash,
        /// Comma-separated sibling hashes, leaf level first
        #[arg(long, value_parser = parse_hash, value_delimiter = ',')]
        proof: Vec<Hash>,
    },

    /// Keccak-256 leaf hash of a UTF-8 record
    HashLeaf {
        /// Record contents
        data: String,
    },

    /// Print Prometheus metrics collected by this process
    Metrics,
}

/// Command result.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// JSON document.
    Json(Value),
    /// Plain text.
    Text(String),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Json(value) => match serde_json::to_string_pretty(value) {
                Ok(text) => f.write_str(&text),
                Err(_) => write!(f, "{}", value),
            },
            Output::Text(text) => f.write_str(text.trim_end()),
        }
    }
}

/// Parse a batch type name or a raw numeric code.
///
/// Numeric codes pass through unchecked so the registry can reject them.
pub fn parse_batch_type_code(input: &str) -> Result<u8, String> {
    match input.trim().parse::<u8>() {
        Ok(code) => Ok(code),
        Err(_) => input.parse::<BatchType>().map(|t| t.code()),
    }
}

fn to_json<T: serde::Serialize>(value: T) -> Result<Output> {
    Ok(Output::Json(
        serde_json::to_value(value).context("Failed to encode output")?,
    ))
}

/// Run one command against `node`.
pub fn execute(node: &RegistryNode, command: Command) -> Result<Output> {
    let registry = node.registry();

    match command {
        Command::Status => to_json(StatusView::new(
            node.backend().name(),
            registry.next_batch_id(),
            &registry.stats(),
        )),

        Command::Publish {
            caller,
            root,
            batch_type,
            start,
            end,
            uri,
            entries,
        } => {
            let request = PublishBatchRequest {
                root,
                batch_type,
                start_timestamp: start,
                end_timestamp: end,
                uri,
                entry_count: entries,
            };
            let id = registry.publish_batch(caller, request)?;
            to_json(BatchView::from(&registry.get_batch(id)?))
        }

        Command::Verify { caller, id } => {
            registry.verify_batch(caller, id)?;
            to_json(BatchView::from(&registry.get_batch(id)?))
        }

        Command::Revoke { caller, id, reason } => {
            let root = registry.get_batch(id).ok().map(|b| b.merkle_root);
            registry.revoke_batch(caller, id, &reason)?;
            to_json(json!({
                "revoked": id,
                "merkle_root": root.map(|r| to_hex(&r)),
                "reason": reason,
            }))
        }

        Command::Pause { caller } => {
            registry.pause(caller)?;
            to_json(json!({ "paused": registry.is_paused() }))
        }

        Command::Unpause { caller } => {
            registry.unpause(caller)?;
            to_json(json!({ "paused": registry.is_paused() }))
        }

        Command::GrantRole {
            caller,
            role,
            account,
        } => {
            let changed = registry.grant_role(caller, role, account)?;
            to_json(RoleChangeView {
                role: role.name(),
                account: to_hex(&account),
                changed,
            })
        }

        Command::RevokeRole {
            caller,
            role,
            account,
        } => {
            let changed = registry.revoke_role(caller, role, account)?;
            to_json(RoleChangeView {
                role: role.name(),
                account: to_hex(&account),
                changed,
            })
        }

        Command::RenounceRole { caller, role } => {
            let changed = registry.renounce_role(caller, role)?;
            to_json(RoleChangeView {
                role: role.name(),
                account: to_hex(&caller),
                changed,
            })
        }

        Command::HasRole { role, account } => to_json(RoleView::new(
            role,
            &account,
            registry.has_role(role, &account),
        )),

        Command::Members { role } => {
            let members: Vec<String> = registry
                .role_members(role)
                .iter()
                .map(|a| to_hex(a))
                .collect();
            to_json(json!({ "role": role.name(), "members": members }))
        }

        Command::Get { id } => to_json(BatchView::from(&registry.get_batch(id)?)),

        Command::ByRoot { root } => to_json(json!({
            "merkle_root": to_hex(&root),
            "batch_id": registry.get_batch_id_by_root(&root),
        })),

        Command::Count { batch_type } => match batch_type {
            Some(batch_type) => to_json(json!({
                "batch_type": batch_type.name(),
                "count": registry.get_batch_count_by_type(batch_type),
            })),
            None => to_json(json!({ "count": registry.get_batch_count() })),
        },

        Command::List {
            batch_type,
            offset,
            limit,
        } => {
            let ids = registry.get_batches_by_type(batch_type, offset, limit)?;
            to_json(PageView::new(
                batch_type,
                registry.get_batch_count_by_type(batch_type),
                offset,
                ids,
            ))
        }

        Command::Latest { limit } => {
            let batches: Vec<BatchView> = registry
                .latest_batches(limit)?
                .iter()
                .map(BatchView::from)
                .collect();
            to_json(batches)
        }

        Command::Prove {
            id,
            root,
            leaf,
            proof,
        } => {
            let _timer = HistogramTimer::new(&PROOF_VERIFY_DURATION);
            let outcome = match (id, root) {
                (Some(id), _) => registry.get_batch(id).and_then(|batch| {
                    registry
                        .verify_proof(id, &leaf, &proof)
                        .map(|valid| (batch.merkle_root, valid))
                }),
                (None, Some(root)) => {
                    Ok((root, registry.verify_proof_for_root(&root, &leaf, &proof)))
                }
                (None, None) => bail!("prove needs --id or --root"),
            };

            let (root, valid) = match outcome {
                Ok(result) => result,
                Err(err) => {
                    PROOF_VERIFICATIONS.with_label_values(&["error"]).inc();
                    return Err(err.into());
                }
            };
            PROOF_VERIFICATIONS
                .with_label_values(&[if valid { "valid" } else { "invalid" }])
                .inc();

            let path = MerkleProof::new(leaf, proof);
            to_json(ProofView {
                batch_id: id,
                root: to_hex(&root),
                computed_root: to_hex(&path.compute_root()),
                leaf: to_hex(&leaf),
                proof: hex_list(&path.siblings),
                depth: path.depth(),
                valid,
            })
        }

        Command::HashLeaf { data } => to_json(json!({
            "data": data,
            "leaf": to_hex(&hash_leaf(data.as_bytes())),
        })),

        Command::Metrics => Ok(Output::Text(
            gather_metrics().context("Failed to gather metrics")?,
        )),
    }
}
