//! Signed votes
//!
//! A vote as it arrives from the transport layer. The signature covers
//! [`vote_message`].

use serde::{Deserialize, Serialize};
use shared_types::{Hash, SignatureScheme, SigningError, ValidatorId};

const VOTE_DOMAIN: &[u8] = b"qc-vote";

/// Canonical signed bytes: `b"qc-vote" | block_hash | validator_id | approve`.
pub fn vote_message(block_hash: &Hash, validator: &ValidatorId, approve: bool) -> Vec<u8> {
    let mut msg = Vec::with_capacity(VOTE_DOMAIN.len() + 32 + 32 + 1);
    msg.extend_from_slice(VOTE_DOMAIN);
    msg.extend_from_slice(block_hash);
    msg.extend_from_slice(validator);
    msg.push(u8::from(approve));
    msg
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedVote {
    pub block_hash: Hash,
    pub validator: ValidatorId,
    pub approve: bool,
    pub signature: Vec<u8>,
}

impl SignedVote {
    /// Sign a vote with `private_key` under `scheme`.
    pub fn sign(
        scheme: &dyn SignatureScheme,
        private_key: &[u8],
        block_hash: Hash,
        validator: ValidatorId,
        approve: bool,
    ) -> Result<Self, SigningError> {
        let signature = scheme.sign(private_key, &vote_message(&block_hash, &validator, approve))?;
        Ok(Self {
            block_hash,
            validator,
            approve,
            signature,
        })
    }

    pub fn message(&self) -> Vec<u8> {
        vote_message(&self.block_hash, &self.validator, self.approve)
    }
}
