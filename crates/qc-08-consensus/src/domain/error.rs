//! Error types for Consensus subsystem
//!
//! Every variant is a local rejection: the call fails, engine state is
//! unchanged, and the node keeps running.

use super::ProposalStatus;
use shared_types::{Hash, ValidatorId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsensusError {
    #[error("Validator set too small: {count} < {min}")]
    InsufficientValidators { count: usize, min: usize },

    #[error("Duplicate validator in set: {0:?}")]
    DuplicateValidator(ValidatorId),

    #[error("Unknown validator: {0:?}")]
    UnknownValidator(ValidatorId),

    #[error("Block data is empty")]
    EmptyPayload,

    #[error("Block data too large: {size} > {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Block already proposed: {0:?}")]
    DuplicateProposal(Hash),

    #[error("Unknown proposal: {0:?}")]
    UnknownProposal(Hash),

    #[error("Proposal is closed ({status})")]
    ProposalClosed { status: ProposalStatus },

    #[error("Duplicate vote from validator: {0:?}")]
    DuplicateVote(ValidatorId),

    #[error("Invalid vote signature from validator: {0:?}")]
    InvalidSignature(ValidatorId),
}

pub type ConsensusResult<T> = Result<T, ConsensusError>;
