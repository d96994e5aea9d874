//! # qc-08-consensus
//!
//! Consensus subsystem for Quantum-Ledger.
//!
//! ## Architecture
//!
//! A fixed validator set votes on block proposals. The engine tracks each
//! proposal through `PROPOSED → VOTING → {FINALIZED | TIMED_OUT | REJECTED}`
//! and queues finalized proposals for the block-production applier:
//!
//! ```text
//! Transport ──propose/vote──→ Consensus (8) ──take_finalized──→ Applier (17)
//! ```
//!
//! ### Quorum Rule
//!
//! With `N` validators, `quorum_size = ceil(2N/3)`. A proposal finalizes iff
//! `total_votes >= quorum_size` and `yes_votes > total_votes / 2`, both at
//! once. A proposal that can no longer meet the rule with the outstanding
//! votes is rejected immediately; one that stays open past the configured
//! timeout is timed out by `expire_stale`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qc_08_consensus::{ConsensusConfig, ConsensusEngine};
//!
//! let engine = ConsensusEngine::initialize(validators, ConsensusConfig::default(), crypto, clock)?;
//! let hash = engine.propose_block(&proposer, &payload)?;
//! let outcome = engine.vote(&validator, &hash, true)?;
//! ```
//!
//! ## Security
//!
//! - `vote_signed` verifies every signature against the registered key
//! - Duplicate votes and votes on closed proposals are refused
//! - Payload size is bounded before hashing

pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

pub use config::ConsensusConfig;
pub use domain::{
    quorum_size, vote_message, ConsensusError, ConsensusResult, Proposal, ProposalStatus,
    SignedVote, ValidatorInfo, ValidatorSet, VoteOutcome, VoteTally, MIN_VALIDATORS,
};
pub use ports::ConsensusApi;
pub use service::ConsensusEngine;
