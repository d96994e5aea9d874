//! # Domain Entities for the Ledger
//!
//! ## Type Decisions
//!
//! - `Amount = u128` - unsigned fixed-point, 18 decimals for the native asset.
//!   Negative balances are unrepresentable; debits are checked up front.
//! - `balances` is a `BTreeMap` so the canonical encoding (and therefore the
//!   state root) does not depend on insertion order.

use super::SpendingLimit;
use serde::{Deserialize, Serialize};
use shared_types::{Amount, AssetId, Nonce};
use std::collections::BTreeMap;

/// Account state.
///
/// Created lazily on first balance write and never deleted. An asset entry
/// is removed when its balance reaches zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Number of accepted transactions sent from this account.
    pub nonce: Nonce,
    /// Asset id to balance. Never holds zero values.
    pub balances: BTreeMap<AssetId, Amount>,
    /// Optional cap on outgoing native transfers.
    pub spending_limit: Option<SpendingLimit>,
}

impl Account {
    /// Create an account holding `amount` of `asset`.
    pub fn with_balance(asset: AssetId, amount: Amount) -> Self {
        let mut account = Self::default();
        account.set_balance(asset, amount);
        account
    }

    /// Balance of `asset` (0 if absent).
    pub fn balance(&self, asset: AssetId) -> Amount {
        self.balances.get(&asset).copied().unwrap_or(0)
    }

    /// Overwrite the balance of `asset`; zero removes the entry.
    pub fn set_balance(&mut self, asset: AssetId, amount: Amount) {
        if amount == 0 {
            self.balances.remove(&asset);
        } else {
            self.balances.insert(asset, amount);
        }
    }

    /// Whether the account holds nothing and has never transacted.
    pub fn is_empty(&self) -> bool {
        self.nonce == 0 && self.balances.is_empty() && self.spending_limit.is_none()
    }
}

/// Outcome of one transaction in a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// Position in the batch.
    pub index: usize,
    /// Action name (`Transaction::kind`).
    pub kind: &'static str,
    /// Sender nonce after the transaction.
    pub nonce: Nonce,
}
