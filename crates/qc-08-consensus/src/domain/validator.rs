//! Validator domain entities

use super::{ConsensusError, ConsensusResult};
use serde::{Deserialize, Serialize};
use shared_types::ValidatorId;
use std::collections::HashMap;

/// Smallest validator set the engine accepts.
pub const MIN_VALIDATORS: usize = 3;

/// Fixed, ordered validator set. No rotation for the lifetime of an engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidatorSet {
    validators: Vec<ValidatorInfo>,
    /// Quick lookup by validator ID
    #[serde(skip)]
    lookup: HashMap<ValidatorId, usize>,
}

impl ValidatorSet {
    /// Build a set, rejecting duplicate ids.
    pub fn new(validators: Vec<ValidatorInfo>) -> ConsensusResult<Self> {
        let mut lookup = HashMap::with_capacity(validators.len());
        for (i, v) in validators.iter().enumerate() {
            if lookup.insert(v.id, i).is_some() {
                return Err(ConsensusError::DuplicateValidator(v.id));
            }
        }
        Ok(Self { validators, lookup })
    }

    /// Get the number of validators
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Check if a validator is in the set
    pub fn contains(&self, validator_id: &ValidatorId) -> bool {
        self.lookup.contains_key(validator_id)
    }

    pub fn get(&self, validator_id: &ValidatorId) -> Option<&ValidatorInfo> {
        self.lookup
            .get(validator_id)
            .and_then(|&idx| self.validators.get(idx))
    }

    pub fn public_key(&self, validator_id: &ValidatorId) -> Option<&[u8]> {
        self.get(validator_id).map(|v| v.public_key.as_slice())
    }

    /// Validators in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidatorInfo> {
        self.validators.iter()
    }

    /// Rebuild the lookup table (after deserialization)
    pub fn rebuild_lookup(&mut self) {
        self.lookup = self
            .validators
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id, i))
            .collect();
    }
}

/// Individual validator information
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    pub id: ValidatorId,
    /// Key checked by `vote_signed`. Format is defined by the injected scheme.
    pub public_key: Vec<u8>,
}

impl ValidatorInfo {
    pub fn new(id: ValidatorId, public_key: Vec<u8>) -> Self {
        Self { id, public_key }
    }
}
