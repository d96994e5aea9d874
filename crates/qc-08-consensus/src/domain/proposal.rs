//! Proposal lifecycle and vote tallies
//!
//! ```text
//! PROPOSED ──open──→ VOTING ──┬── quorum ──────────→ FINALIZED
//!                             ├── quorum impossible → REJECTED
//!                             └── timeout ─────────→ TIMED_OUT
//! ```
//!
//! Closed states are terminal. A finalized proposal is immutable.

use serde::{Deserialize, Serialize};
use shared_types::{Hash, TimestampMs, ValidatorId};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Proposed,
    Voting,
    Finalized,
    TimedOut,
    Rejected,
}

impl ProposalStatus {
    /// Whether the proposal no longer accepts votes.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            ProposalStatus::Finalized | ProposalStatus::TimedOut | ProposalStatus::Rejected
        )
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProposalStatus::Proposed => "PROPOSED",
            ProposalStatus::Voting => "VOTING",
            ProposalStatus::Finalized => "FINALIZED",
            ProposalStatus::TimedOut => "TIMED_OUT",
            ProposalStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// Votes on one proposal, at most one per validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    votes: BTreeMap<ValidatorId, bool>,
}

impl VoteTally {
    /// Record a vote. Returns `false` if `validator` already voted.
    pub fn record(&mut self, validator: ValidatorId, approve: bool) -> bool {
        if self.votes.contains_key(&validator) {
            return false;
        }
        self.votes.insert(validator, approve);
        true
    }

    pub fn has_voted(&self, validator: &ValidatorId) -> bool {
        self.votes.contains_key(validator)
    }

    pub fn vote_of(&self, validator: &ValidatorId) -> Option<bool> {
        self.votes.get(validator).copied()
    }

    pub fn yes(&self) -> usize {
        self.votes.values().filter(|v| **v).count()
    }

    pub fn no(&self) -> usize {
        self.total() - self.yes()
    }

    pub fn total(&self) -> usize {
        self.votes.len()
    }
}

/// A block proposal and its voting record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// `H(payload)`.
    pub hash: Hash,
    pub proposer: ValidatorId,
    /// Opaque block data, replayed by the applier once finalized.
    pub payload: Vec<u8>,
    pub status: ProposalStatus,
    pub opened_at: TimestampMs,
    /// Set when the proposal reaches a closed state.
    pub closed_at: Option<TimestampMs>,
    pub tally: VoteTally,
}

impl Proposal {
    pub fn new(hash: Hash, proposer: ValidatorId, payload: Vec<u8>, now: TimestampMs) -> Self {
        Self {
            hash,
            proposer,
            payload,
            status: ProposalStatus::Proposed,
            opened_at: now,
            closed_at: None,
            tally: VoteTally::default(),
        }
    }

    /// PROPOSED → VOTING.
    pub fn open_voting(&mut self) {
        if self.status == ProposalStatus::Proposed {
            self.status = ProposalStatus::Voting;
        }
    }

    /// Move to a closed state. No-op if already closed.
    pub fn close(&mut self, status: ProposalStatus, now: TimestampMs) {
        if self.status.is_closed() || !status.is_closed() {
            return;
        }
        self.status = status;
        self.closed_at = Some(now);
    }

    /// Age at `now`, saturating at zero for clocks that step backwards.
    pub fn age(&self, now: TimestampMs) -> u64 {
        now.saturating_sub(self.opened_at)
    }
}

/// Result of a recorded vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Quorum reached; the proposal is now FINALIZED.
    Finalized,
    /// Quorum not reached yet; still VOTING.
    Pending,
    /// Quorum can no longer be reached; the proposal is now REJECTED.
    Rejected,
}

impl VoteOutcome {
    pub fn is_finalized(self) -> bool {
        self == VoteOutcome::Finalized
    }
}
