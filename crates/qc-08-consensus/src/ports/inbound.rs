//! Driving ports (Inbound API)
//!
//! The local call surface a transport layer or the block-production driver
//! invokes. Broadcasting proposals and votes between processes is the
//! transport's job.

use crate::domain::{ConsensusResult, Proposal, ProposalStatus, SignedVote, VoteOutcome};
use shared_types::{Hash, TimestampMs, ValidatorId};

/// Primary Consensus API
pub trait ConsensusApi: Send + Sync {
    /// Open voting on `data` proposed by `proposer`. Returns `H(data)`.
    fn propose_block(&self, proposer: &ValidatorId, data: &[u8]) -> ConsensusResult<Hash>;

    /// Record an unauthenticated vote from a trusted local caller.
    fn vote(
        &self,
        validator: &ValidatorId,
        block_hash: &Hash,
        approve: bool,
    ) -> ConsensusResult<VoteOutcome>;

    /// Verify the vote signature, then record it.
    fn vote_signed(&self, vote: &SignedVote) -> ConsensusResult<VoteOutcome>;

    fn status(&self, block_hash: &Hash) -> Option<ProposalStatus>;

    /// Time out every VOTING proposal older than the configured window.
    fn expire_stale(&self, now: TimestampMs) -> Vec<Hash>;

    /// Drain finalized proposals, each exactly once, in finalization order.
    fn take_finalized(&self) -> Vec<Proposal>;

    /// Forget proposals closed before `before`. Returns how many were dropped.
    fn prune_closed(&self, before: TimestampMs) -> usize;
}
