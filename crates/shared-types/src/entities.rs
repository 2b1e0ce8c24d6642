//! # Core Primitive Entities
//!
//! Fixed-size identifiers and their text encodings.
//!
//! Text form is lowercase hex with an optional `0x` prefix on input and a
//! mandatory `0x` prefix on output, matching what ledger tooling prints.

use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-byte hash (Keccak-256 digest or Merkle root).
pub type Hash = [u8; 32];

/// A 20-byte account identity.
pub type Address = [u8; 20];

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Sequential batch identifier. Valid ids start at 1.
pub type BatchId = u64;

/// The all-zero hash (never a valid Merkle root).
pub const ZERO_HASH: Hash = [0u8; 32];

/// The null identity.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Category of off-chain computation a batch summarises.
///
/// The numeric codes are part of the wire format: DEPOSIT=0, YIELD=1,
/// TRADE=2, WITHDRAW=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BatchType {
    /// Deposit records.
    Deposit,
    /// Yield accrual records.
    Yield,
    /// Trade records.
    Trade,
    /// Withdrawal records.
    Withdraw,
}

impl BatchType {
    /// Every batch type in code order.
    pub const ALL: [BatchType; 4] = [Self::Deposit, Self::Yield, Self::Trade, Self::Withdraw];

    /// Wire code of this type.
    pub const fn code(self) -> u8 {
        match self {
            Self::Deposit => 0,
            Self::Yield => 1,
            Self::Trade => 2,
            Self::Withdraw => 3,
        }
    }

    /// Decode a wire code. Returns `None` for codes outside the enum.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Deposit),
            1 => Some(Self::Yield),
            2 => Some(Self::Trade),
            3 => Some(Self::Withdraw),
            _ => None,
        }
    }

    /// Upper-case display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Yield => "YIELD",
            Self::Trade => "TRADE",
            Self::Withdraw => "WITHDRAW",
        }
    }
}

impl fmt::Display for BatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code).ok_or_else(|| format!("unknown batch type code {code}"));
        }
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown batch type {s}"))
    }
}

/// Privileged roles gating registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Manages roles and revokes batches. Self-administering.
    Admin,
    /// Publishes and verifies batches.
    Publisher,
    /// Pauses and unpauses publication.
    Pauser,
}

impl Role {
    /// Every role.
    pub const ALL: [Role; 3] = [Self::Admin, Self::Publisher, Self::Pauser];

    /// Canonical role name. Role identifiers are derived from these bytes.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN_ROLE",
            Self::Publisher => "PUBLISHER_ROLE",
            Self::Pauser => "PAUSER_ROLE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        let bare = upper.strip_suffix("_ROLE").unwrap_or(&upper);
        match bare {
            "ADMIN" => Ok(Self::Admin),
            "PUBLISHER" | "ORACLE" => Ok(Self::Publisher),
            "PAUSER" => Ok(Self::Pauser),
            _ => Err(format!("unknown role {s}")),
        }
    }
}

/// Returns true if `hash` is the all-zero value.
pub fn is_zero_hash(hash: &Hash) -> bool {
    hash == &ZERO_HASH
}

/// Returns true if `address` is the null identity.
pub fn is_zero_address(address: &Address) -> bool {
    address == &ZERO_ADDRESS
}

/// Decode exactly `N` bytes from hex, accepting an optional `0x` prefix.
pub fn parse_fixed_hex<const N: usize>(input: &str) -> Result<[u8; N], ParseError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(digits).map_err(|e| ParseError::InvalidHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(ParseError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }

    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Parse a 32-byte hash from hex.
pub fn parse_hash(input: &str) -> Result<Hash, ParseError> {
    parse_fixed_hex::<32>(input)
}

/// Parse a 20-byte address from hex.
pub fn parse_address(input: &str) -> Result<Address, ParseError> {
    parse_fixed_hex::<20>(input)
}

/// Format bytes as `0x`-prefixed lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Short form used in log lines: first four bytes only.
pub fn short_hex(bytes: &[u8]) -> String {
    let end = bytes.len().min(4);
    format!("0x{}..", hex::encode(&bytes[..end]))
}

/// Serde support for fixed-size byte arrays as `0x` hex strings.
///
/// Use with `#[serde(with = "shared_types::entities::hex_bytes")]` on
/// `Hash` and `Address` fields of JSON-facing types.
pub mod hex_bytes {
    use super::{parse_fixed_hex, to_hex};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_hex(bytes))
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_fixed_hex::<N>(&text).map_err(de::Error::custom)
    }
}
