use super::LimitWindow;
use shared_types::{Address, Amount, AssetId, Capability, CodecError, Nonce};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Invalid transaction: {0}")]
    Validation(String),

    #[error("Insufficient funds for asset {asset}: required {required}, available {available}")]
    InsufficientFunds {
        address: Address,
        asset: AssetId,
        required: Amount,
        available: Amount,
    },

    #[error("Invalid nonce: expected {expected}, got {actual}")]
    InvalidNonce { expected: Nonce, actual: Nonce },

    #[error("{window} spending limit exceeded: limit {limit}, attempted {attempted}")]
    LimitExceeded {
        window: LimitWindow,
        limit: Amount,
        attempted: Amount,
    },

    #[error("Unauthorized: {address:?} lacks {capability:?}")]
    Unauthorized {
        address: Address,
        capability: Capability,
    },

    #[error("Balance overflow for asset {asset}")]
    BalanceOverflow { address: Address, asset: AssetId },

    #[error("Block aborted at transaction {index}: {source}")]
    BlockAborted {
        index: usize,
        #[source]
        source: Box<LedgerError>,
    },

    #[error("Snapshot error: {0}")]
    Codec(#[from] CodecError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
