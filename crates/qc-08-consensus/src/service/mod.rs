//! # Consensus Engine
//!
//! Owns the validator set and every proposal's vote tally. One `Mutex`
//! guards the proposal map and the finalized queue; each call is a short
//! critical section with no I/O.
//!
//! ## Vote Handling
//!
//! 1. Reject unknown validators, unknown or closed proposals, duplicate votes
//! 2. Record the vote
//! 3. Finalize if the quorum rule holds
//! 4. Otherwise reject if no sequence of outstanding votes can satisfy it


use crate::config::ConsensusConfig;
use crate::domain::{
    can_still_finalize, is_finalizable, quorum_size, ConsensusError, ConsensusResult, Proposal,
    ProposalStatus, SignedVote, ValidatorInfo, ValidatorSet, VoteOutcome,
};
use crate::metrics;
use crate::ports::ConsensusApi;
use parking_lot::Mutex;
use shared_types::{short_hex, CryptoProvider, Hash, TimeSource, TimestampMs, ValidatorId};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Default)]
struct EngineState {
    proposals: HashMap<Hash, Proposal>,
    /// Snapshots taken at finalization, drained by `take_finalized`.
    finalized: VecDeque<Proposal>,
    /// Every hash ever finalized. Survives `prune_closed`.
    finalized_hashes: HashSet<Hash>,
}

pub struct ConsensusEngine {
    validators: ValidatorSet,
    config: ConsensusConfig,
    crypto: Arc<dyn CryptoProvider>,
    time_source: Arc<dyn TimeSource>,
    state: Mutex<EngineState>,
}

impl ConsensusEngine {
    /// Create an engine over a fixed validator set.
    ///
    /// Fails with `InsufficientValidators` below the configured minimum
    /// (never less than 3) and with `DuplicateValidator` on repeated ids.
    pub fn initialize(
        validators: Vec<ValidatorInfo>,
        config: ConsensusConfig,
        crypto: Arc<dyn CryptoProvider>,
        time_source: Arc<dyn TimeSource>,
    ) -> ConsensusResult<Self> {
        let min = config.effective_min_validators();
        if validators.len() < min {
            return Err(ConsensusError::InsufficientValidators {
                count: validators.len(),
                min,
            });
        }
        let validators = ValidatorSet::new(validators)?;
        info!(
            "[qc-08] Consensus initialized: {} validators, quorum {}",
            validators.len(),
            quorum_size(validators.len())
        );
        Ok(Self {
            validators,
            config,
            crypto,
            time_source,
            state: Mutex::new(EngineState::default()),
        })
    }

    // === Queries ===

    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    pub fn quorum_size(&self) -> usize {
        quorum_size(self.validators.len())
    }

    pub fn validators(&self) -> &ValidatorSet {
        &self.validators
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// Current status. A finalized hash stays `Finalized` after pruning.
    pub fn status(&self, block_hash: &Hash) -> Option<ProposalStatus> {
        let state = self.state.lock();
        match state.proposals.get(block_hash) {
            Some(p) => Some(p.status),
            None if state.finalized_hashes.contains(block_hash) => {
                Some(ProposalStatus::Finalized)
            }
            None => None,
        }
    }

    /// `(yes, no, total)` for a known proposal.
    pub fn tally(&self, block_hash: &Hash) -> Option<(usize, usize, usize)> {
        self.state
            .lock()
            .proposals
            .get(block_hash)
            .map(|p| (p.tally.yes(), p.tally.no(), p.tally.total()))
    }

    pub fn proposal(&self, block_hash: &Hash) -> Option<Proposal> {
        self.state.lock().proposals.get(block_hash).cloned()
    }

    /// Number of tracked proposals, open and closed.
    pub fn proposal_count(&self) -> usize {
        self.state.lock().proposals.len()
    }

    // === Proposals ===

    pub fn propose_block(&self, proposer: &ValidatorId, data: &[u8]) -> ConsensusResult<Hash> {
        if !self.validators.contains(proposer) {
            return Err(ConsensusError::UnknownValidator(*proposer));
        }
        if data.is_empty() {
            return Err(ConsensusError::EmptyPayload);
        }
        if data.len() > self.config.max_payload_bytes {
            return Err(ConsensusError::PayloadTooLarge {
                size: data.len(),
                max: self.config.max_payload_bytes,
            });
        }

        let hash = self.crypto.hash(data);
        let now = self.time_source.now_ms();
        let mut state = self.state.lock();

        // Re-proposal is allowed only after a TIMED_OUT or REJECTED round.
        if state.finalized_hashes.contains(&hash) {
            return Err(ConsensusError::DuplicateProposal(hash));
        }
        if let Some(existing) = state.proposals.get(&hash) {
            if matches!(
                existing.status,
                ProposalStatus::Proposed | ProposalStatus::Voting | ProposalStatus::Finalized
            ) {
                return Err(ConsensusError::DuplicateProposal(hash));
            }
        }

        let mut proposal = Proposal::new(hash, *proposer, data.to_vec(), now);
        proposal.open_voting();
        state.proposals.insert(hash, proposal);

        info!(
            "[qc-08] Proposal 0x{} opened by 0x{} ({} bytes)",
            short_hex(&hash),
            short_hex(proposer),
            data.len()
        );
        Ok(hash)
    }

    // === Votes ===

    pub fn vote(
        &self,
        validator: &ValidatorId,
        block_hash: &Hash,
        approve: bool,
    ) -> ConsensusResult<VoteOutcome> {
        let result = self.record_vote(validator, block_hash, approve);
        if let Err(e) = &result {
            debug!(
                "[qc-08] Vote from 0x{} on 0x{} refused: {}",
                short_hex(validator),
                short_hex(block_hash),
                e
            );
            metrics::record_vote_refused(refusal_reason(e));
        }
        result
    }

    /// Verify `vote.signature` against the validator's registered key over
    /// [`crate::domain::vote_message`], then record the vote.
    pub fn vote_signed(&self, vote: &SignedVote) -> ConsensusResult<VoteOutcome> {
        let public_key = self
            .validators
            .public_key(&vote.validator)
            .ok_or(ConsensusError::UnknownValidator(vote.validator))?;
        if !self
            .crypto
            .verify(public_key, &vote.message(), &vote.signature)
        {
            warn!(
                "[qc-08] Bad vote signature from 0x{} on 0x{}",
                short_hex(&vote.validator),
                short_hex(&vote.block_hash)
            );
            metrics::record_vote_refused("invalid_signature");
            return Err(ConsensusError::InvalidSignature(vote.validator));
        }
        self.vote(&vote.validator, &vote.block_hash, vote.approve)
    }

    fn record_vote(
        &self,
        validator: &ValidatorId,
        block_hash: &Hash,
        approve: bool,
    ) -> ConsensusResult<VoteOutcome> {
        if !self.validators.contains(validator) {
            return Err(ConsensusError::UnknownValidator(*validator));
        }
        let n = self.validators.len();
        let now = self.time_source.now_ms();

        let mut guard = self.state.lock();
        let state = &mut *guard;
        let proposal = state
            .proposals
            .get_mut(block_hash)
            .ok_or(ConsensusError::UnknownProposal(*block_hash))?;
        if proposal.status != ProposalStatus::Voting {
            return Err(ConsensusError::ProposalClosed {
                status: proposal.status,
            });
        }
        if !proposal.tally.record(*validator, approve) {
            return Err(ConsensusError::DuplicateVote(*validator));
        }

        let (yes, total) = (proposal.tally.yes(), proposal.tally.total());
        if is_finalizable(n, yes, total) {
            proposal.close(ProposalStatus::Finalized, now);
            state.finalized.push_back(proposal.clone());
            state.finalized_hashes.insert(*block_hash);
            metrics::record_proposal_finalized();
            info!(
                "[qc-08] ✓ Block 0x{} FINALIZED ({} yes / {} votes, quorum {})",
                short_hex(block_hash),
                yes,
                total,
                quorum_size(n)
            );
            return Ok(VoteOutcome::Finalized);
        }
        if !can_still_finalize(n, yes, total) {
            proposal.close(ProposalStatus::Rejected, now);
            metrics::record_proposal_rejected();
            info!(
                "[qc-08] Block 0x{} REJECTED ({} yes / {} votes of {})",
                short_hex(block_hash),
                yes,
                total,
                n
            );
            return Ok(VoteOutcome::Rejected);
        }
        Ok(VoteOutcome::Pending)
    }

    // === Maintenance ===

    /// Time out every VOTING proposal whose age at `now` has reached the
    /// configured timeout. Returns the expired hashes.
    pub fn expire_stale(&self, now: TimestampMs) -> Vec<Hash> {
        let timeout = self.config.proposal_timeout_ms();
        let mut state = self.state.lock();
        let mut expired = Vec::new();
        for proposal in state.proposals.values_mut() {
            if proposal.status == ProposalStatus::Voting && proposal.age(now) >= timeout {
                proposal.close(ProposalStatus::TimedOut, now);
                expired.push(proposal.hash);
            }
        }
        drop(state);

        if !expired.is_empty() {
            metrics::record_proposals_timed_out(expired.len());
            for hash in &expired {
                warn!("[qc-08] Proposal 0x{} TIMED_OUT", short_hex(hash));
            }
        }
        expired
    }

    /// Drain proposals finalized since the last call, in finalization order.
    pub fn take_finalized(&self) -> Vec<Proposal> {
        self.state.lock().finalized.drain(..).collect()
    }

    /// Forget closed proposals that closed before `before`. Open proposals
    /// and queued finalized snapshots are kept; finalized hashes stay
    /// blocked from re-proposal.
    pub fn prune_closed(&self, before: TimestampMs) -> usize {
        let mut state = self.state.lock();
        let initial = state.proposals.len();
        state
            .proposals
            .retain(|_, p| !matches!(p.closed_at, Some(at) if at < before));
        let pruned = initial - state.proposals.len();
        if pruned > 0 {
            debug!("[qc-08] Pruned {} closed proposals", pruned);
        }
        pruned
    }
}

fn refusal_reason(err: &ConsensusError) -> &'static str {
    match err {
        ConsensusError::UnknownValidator(_) => "unknown_validator",
        ConsensusError::UnknownProposal(_) => "unknown_proposal",
        ConsensusError::ProposalClosed { .. } => "proposal_closed",
        ConsensusError::DuplicateVote(_) => "duplicate",
        ConsensusError::InvalidSignature(_) => "invalid_signature",
        _ => "other",
    }
}

impl ConsensusApi for ConsensusEngine {
    fn propose_block(&self, proposer: &ValidatorId, data: &[u8]) -> ConsensusResult<Hash> {
        ConsensusEngine::propose_block(self, proposer, data)
    }

    fn vote(
        &self,
        validator: &ValidatorId,
        block_hash: &Hash,
        approve: bool,
    ) -> ConsensusResult<VoteOutcome> {
        ConsensusEngine::vote(self, validator, block_hash, approve)
    }

    fn vote_signed(&self, vote: &SignedVote) -> ConsensusResult<VoteOutcome> {
        ConsensusEngine::vote_signed(self, vote)
    }

    fn status(&self, block_hash: &Hash) -> Option<ProposalStatus> {
        ConsensusEngine::status(self, block_hash)
    }

    fn expire_stale(&self, now: TimestampMs) -> Vec<Hash> {
        ConsensusEngine::expire_stale(self, now)
    }

    fn take_finalized(&self) -> Vec<Proposal> {
        ConsensusEngine::take_finalized(self)
    }

    fn prune_closed(&self, before: TimestampMs) -> usize {
        ConsensusEngine::prune_closed(self, before)
    }
}
