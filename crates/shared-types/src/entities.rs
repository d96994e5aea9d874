//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identifiers**: `Hash`, `Address`, `ValidatorId`, `AssetId`
//! - **Ledger**: `Amount`, `Nonce`, `Transaction`, `TxAction`
//! - **Chain**: `BlockPayload`, `Block`

use crate::roles::Role;
use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: IDENTIFIERS
// =============================================================================

/// A 32-byte digest produced by the injected hash function.
pub type Hash = [u8; 32];

/// A 20-byte account address.
pub type Address = [u8; 20];

/// Opaque validator identifier (32 bytes, usually a public key digest).
pub type ValidatorId = [u8; 32];

/// Asset (denomination) identifier.
pub type AssetId = u32;

/// Unsigned fixed-point amount in base units.
pub type Amount = u128;

/// Per-account transaction counter.
pub type Nonce = u64;

/// Milliseconds since the Unix epoch (UTC).
pub type TimestampMs = u64;

/// The all-zero hash. Parent of the genesis entry.
pub const ZERO_HASH: Hash = [0u8; 32];

/// The native asset of the ledger.
pub const NATIVE_ASSET: AssetId = 0;

/// Decimal places of the native asset (1 unit = 10^18 base units).
pub const NATIVE_DECIMALS: u32 = 18;

/// Hex-encode the first 8 bytes of a hash, for log lines.
pub fn short_hex(hash: &[u8]) -> String {
    hex::encode(&hash[..hash.len().min(8)])
}

// =============================================================================
// CLUSTER B: LEDGER
// =============================================================================

/// A ledger transaction.
///
/// `nonce` must equal the sender's current nonce plus one. Every accepted
/// transaction advances the sender's nonce by exactly one, whatever its action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sending account.
    pub from: Address,
    /// Sender's next nonce.
    pub nonce: Nonce,
    /// What the transaction does.
    pub action: TxAction,
}

/// The operation carried by a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxAction {
    /// Move `amount` of `asset` from the sender to `to`. Supply-neutral.
    Transfer {
        to: Address,
        asset: AssetId,
        amount: Amount,
    },
    /// Create `amount` of `asset` in `to`. Sender needs `Capability::Mint`.
    Mint {
        to: Address,
        asset: AssetId,
        amount: Amount,
    },
    /// Destroy `amount` of the sender's `asset`. Sender needs `Capability::Burn`.
    Burn { asset: AssetId, amount: Amount },
    /// Install or replace the sender's spending limit. Zero means unlimited.
    SetSpendingLimit {
        daily_limit: Amount,
        monthly_limit: Amount,
    },
    /// Remove the sender's spending limit.
    ClearSpendingLimit,
    /// Assign `role` to `account`. Sender needs `Capability::ManageRoles`.
    GrantRole { account: Address, role: Role },
    /// Remove any role from `account`. Sender needs `Capability::ManageRoles`.
    RevokeRole { account: Address },
}

impl Transaction {
    /// Build a plain transfer.
    pub fn transfer(from: Address, to: Address, asset: AssetId, amount: Amount, nonce: Nonce) -> Self {
        Self {
            from,
            nonce,
            action: TxAction::Transfer { to, asset, amount },
        }
    }

    /// Build a mint.
    pub fn mint(from: Address, to: Address, asset: AssetId, amount: Amount, nonce: Nonce) -> Self {
        Self {
            from,
            nonce,
            action: TxAction::Mint { to, asset, amount },
        }
    }

    /// Build a burn of the sender's own balance.
    pub fn burn(from: Address, asset: AssetId, amount: Amount, nonce: Nonce) -> Self {
        Self {
            from,
            nonce,
            action: TxAction::Burn { asset, amount },
        }
    }

    /// Short name of the action, for logs and receipts.
    pub fn kind(&self) -> &'static str {
        match self.action {
            TxAction::Transfer { .. } => "transfer",
            TxAction::Mint { .. } => "mint",
            TxAction::Burn { .. } => "burn",
            TxAction::SetSpendingLimit { .. } => "set_spending_limit",
            TxAction::ClearSpendingLimit => "clear_spending_limit",
            TxAction::GrantRole { .. } => "grant_role",
            TxAction::RevokeRole { .. } => "revoke_role",
        }
    }
}

// =============================================================================
// CLUSTER C: CHAIN
// =============================================================================

/// The data a proposer submits for voting.
///
/// Transactions are replayed in exactly this order on every replica.
/// `timestamp_ms` is the time every replica uses for spending-limit windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayload {
    /// Proposal time, ms since the Unix epoch (UTC).
    pub timestamp_ms: TimestampMs,
    /// Ordered transaction list.
    pub transactions: Vec<Transaction>,
}

impl BlockPayload {
    /// Create a payload.
    pub fn new(timestamp_ms: TimestampMs, transactions: Vec<Transaction>) -> Self {
        Self {
            timestamp_ms,
            transactions,
        }
    }

    /// Canonical bytes handed to the consensus engine.
    pub fn encode(&self) -> Result<Vec<u8>, crate::CodecError> {
        bincode::serialize(self).map_err(|e| crate::CodecError::Serialization(e.to_string()))
    }

    /// Decode canonical bytes.
    pub fn decode(data: &[u8]) -> Result<Self, crate::CodecError> {
        bincode::deserialize(data).map_err(|e| crate::CodecError::Deserialization(e.to_string()))
    }
}

/// A finalized block header as recorded in the block log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain (genesis is 0).
    pub sequence: u64,
    /// Hash of the previous log entry.
    pub parent_hash: Hash,
    /// Hash of the encoded payload (the consensus block hash).
    pub tx_list_hash: Hash,
    /// Ledger state root after replaying the payload.
    pub state_root: Hash,
}

impl Block {
    /// Canonical bytes; the block log hashes these.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + 32 * 3);
        out.extend_from_slice(&self.sequence.to_be_bytes());
        out.extend_from_slice(&self.parent_hash);
        out.extend_from_slice(&self.tx_list_hash);
        out.extend_from_slice(&self.state_root);
        out
    }
}
