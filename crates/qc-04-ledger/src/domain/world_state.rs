//! # World State
//!
//! The complete account map plus the role table.
//!
//! Every mutating operation validates first and writes last, so an `Err`
//! return never leaves a partial write behind.

use super::{
    Account, BatchReceipt, FailurePolicy, LedgerError, LedgerResult, SpendingLimit, TxReceipt,
};
use serde::{Deserialize, Serialize};
use shared_types::{
    decode_snapshot, encode_snapshot, Address, Amount, AssetId, Capability, CodecError, Hash,
    Hasher, Nonce, Persistable, Role, TimestampMs, Transaction, TxAction, NATIVE_ASSET,
};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    accounts: BTreeMap<Address, Account>,
    roles: BTreeMap<Address, Role>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty state with `owner` holding [`Role::Owner`].
    pub fn with_owner(owner: Address) -> Self {
        let mut state = Self::default();
        state.roles.insert(owner, Role::Owner);
        state
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Balance of `asset` held by `address` (0 if absent).
    pub fn get_balance(&self, address: &Address, asset: AssetId) -> Amount {
        self.accounts
            .get(address)
            .map(|a| a.balance(asset))
            .unwrap_or(0)
    }

    pub fn get_nonce(&self, address: &Address) -> Nonce {
        self.accounts.get(address).map(|a| a.nonce).unwrap_or(0)
    }

    pub fn role(&self, address: &Address) -> Option<Role> {
        self.roles.get(address).copied()
    }

    pub fn spending_limit(&self, address: &Address) -> Option<&SpendingLimit> {
        self.accounts
            .get(address)
            .and_then(|a| a.spending_limit.as_ref())
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Sum of every balance of `asset`. Saturates rather than wrapping.
    pub fn total_supply(&self, asset: AssetId) -> Amount {
        self.accounts
            .values()
            .fold(0u128, |sum, a| sum.saturating_add(a.balance(asset)))
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }

    /// Hash of the canonical encoding of the whole state.
    pub fn state_root(&self, hasher: &dyn Hasher) -> LedgerResult<Hash> {
        let bytes =
            bincode::serialize(self).map_err(|e| CodecError::Serialization(e.to_string()))?;
        Ok(hasher.hash(&bytes))
    }

    // =========================================================================
    // RAW WRITES
    // =========================================================================

    /// Overwrite a balance, creating the account if needed. Zero removes the entry.
    pub fn set_balance(&mut self, address: Address, asset: AssetId, amount: Amount) {
        self.account_mut(address).set_balance(asset, amount);
    }

    /// Move `amount` from `from` to `to`. Both sides happen or neither does.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        asset: AssetId,
        amount: Amount,
    ) -> LedgerResult<()> {
        let (debited, credited) = self.plan_transfer(from, to, asset, amount)?;
        self.set_balance(from, asset, debited);
        self.set_balance(to, asset, credited);
        Ok(())
    }

    /// Create supply without a capability check. Used for genesis allocation.
    pub fn mint(&mut self, to: Address, asset: AssetId, amount: Amount) -> LedgerResult<()> {
        let credited = self.plan_credit(to, asset, amount)?;
        self.set_balance(to, asset, credited);
        Ok(())
    }

    /// Destroy supply without a capability check.
    pub fn burn(&mut self, from: Address, asset: AssetId, amount: Amount) -> LedgerResult<()> {
        let debited = self.plan_debit(from, asset, amount)?;
        self.set_balance(from, asset, debited);
        Ok(())
    }

    pub fn grant_role(&mut self, account: Address, role: Role) {
        self.roles.insert(account, role);
    }

    pub fn revoke_role(&mut self, account: &Address) -> Option<Role> {
        self.roles.remove(account)
    }

    // =========================================================================
    // TRANSACTIONS
    // =========================================================================

    /// Validate and apply one transaction at time `now_ms`.
    ///
    /// Checks run in order: nonce, amount, capability, funds, spending limit.
    pub fn apply_transaction_at(
        &mut self,
        tx: &Transaction,
        now_ms: TimestampMs,
    ) -> LedgerResult<TxReceipt> {
        let current = self.get_nonce(&tx.from);
        let expected = current
            .checked_add(1)
            .ok_or_else(|| LedgerError::Validation("nonce exhausted".into()))?;
        if tx.nonce != expected {
            return Err(LedgerError::InvalidNonce {
                expected,
                actual: tx.nonce,
            });
        }

        match &tx.action {
            TxAction::Transfer { to, asset, amount } => {
                require_positive(*amount)?;
                let (debited, credited) = self.plan_transfer(tx.from, *to, *asset, *amount)?;
                let limit = self.plan_limit(&tx.from, *asset, *amount, now_ms)?;

                self.set_balance(tx.from, *asset, debited);
                self.set_balance(*to, *asset, credited);
                if let Some(limit) = limit {
                    self.account_mut(tx.from).spending_limit = Some(limit);
                }
            }
            TxAction::Mint { to, asset, amount } => {
                require_positive(*amount)?;
                self.require(&tx.from, Capability::Mint)?;
                let credited = self.plan_credit(*to, *asset, *amount)?;
                self.set_balance(*to, *asset, credited);
            }
            TxAction::Burn { asset, amount } => {
                require_positive(*amount)?;
                self.require(&tx.from, Capability::Burn)?;
                let debited = self.plan_debit(tx.from, *asset, *amount)?;
                self.set_balance(tx.from, *asset, debited);
            }
            TxAction::SetSpendingLimit {
                daily_limit,
                monthly_limit,
            } => {
                self.account_mut(tx.from).spending_limit =
                    Some(SpendingLimit::new(*daily_limit, *monthly_limit, now_ms));
            }
            TxAction::ClearSpendingLimit => {
                self.account_mut(tx.from).spending_limit = None;
            }
            TxAction::GrantRole { account, role } => {
                self.require(&tx.from, Capability::ManageRoles)?;
                self.roles.insert(*account, *role);
            }
            TxAction::RevokeRole { account } => {
                self.require(&tx.from, Capability::ManageRoles)?;
                if *account == tx.from {
                    return Err(LedgerError::Validation(
                        "an account cannot revoke its own role".into(),
                    ));
                }
                self.roles.remove(account);
            }
        }

        self.account_mut(tx.from).nonce = tx.nonce;
        Ok(TxReceipt {
            index: 0,
            kind: tx.kind(),
            nonce: tx.nonce,
        })
    }

    /// Apply `txs` in order with one timestamp.
    ///
    /// Under [`FailurePolicy::AbortBlock`] the batch runs against a staged copy
    /// that replaces `self` only when every transaction succeeded.
    pub fn apply_batch(
        &mut self,
        txs: &[Transaction],
        now_ms: TimestampMs,
        policy: FailurePolicy,
    ) -> LedgerResult<BatchReceipt> {
        let mut receipt = BatchReceipt::default();
        match policy {
            FailurePolicy::AbortBlock => {
                let mut staged = self.clone();
                for (index, tx) in txs.iter().enumerate() {
                    let mut applied = staged.apply_transaction_at(tx, now_ms).map_err(|e| {
                        LedgerError::BlockAborted {
                            index,
                            source: Box::new(e),
                        }
                    })?;
                    applied.index = index;
                    receipt.applied.push(applied);
                }
                *self = staged;
            }
            FailurePolicy::SkipAndContinue => {
                for (index, tx) in txs.iter().enumerate() {
                    match self.apply_transaction_at(tx, now_ms) {
                        Ok(mut applied) => {
                            applied.index = index;
                            receipt.applied.push(applied);
                        }
                        Err(e) => receipt.skipped.push((index, e)),
                    }
                }
            }
        }
        Ok(receipt)
    }

    // =========================================================================
    // PLANNING (no writes)
    // =========================================================================

    fn account_mut(&mut self, address: Address) -> &mut Account {
        self.accounts.entry(address).or_default()
    }

    fn require(&self, address: &Address, capability: Capability) -> LedgerResult<()> {
        match self.role(address) {
            Some(role) if role.allows(capability) => Ok(()),
            _ => Err(LedgerError::Unauthorized {
                address: *address,
                capability,
            }),
        }
    }

    fn plan_debit(&self, from: Address, asset: AssetId, amount: Amount) -> LedgerResult<Amount> {
        let available = self.get_balance(&from, asset);
        available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds {
                address: from,
                asset,
                required: amount,
                available,
            })
    }

    fn plan_credit(&self, to: Address, asset: AssetId, amount: Amount) -> LedgerResult<Amount> {
        self.get_balance(&to, asset)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { address: to, asset })
    }

    fn plan_transfer(
        &self,
        from: Address,
        to: Address,
        asset: AssetId,
        amount: Amount,
    ) -> LedgerResult<(Amount, Amount)> {
        if from == to {
            return Err(LedgerError::Validation(
                "sender and recipient are the same account".into(),
            ));
        }
        let debited = self.plan_debit(from, asset, amount)?;
        let credited = self.plan_credit(to, asset, amount)?;
        Ok((debited, credited))
    }

    /// Updated limit after recording `amount`, or `None` when no limit applies.
    fn plan_limit(
        &self,
        from: &Address,
        asset: AssetId,
        amount: Amount,
        now_ms: TimestampMs,
    ) -> LedgerResult<Option<SpendingLimit>> {
        if asset != NATIVE_ASSET {
            return Ok(None);
        }
        let Some(limit) = self.spending_limit(from) else {
            return Ok(None);
        };
        let mut updated = limit.clone();
        updated.check_and_record(amount, now_ms)?;
        Ok(Some(updated))
    }
}

fn require_positive(amount: Amount) -> LedgerResult<()> {
    if amount == 0 {
        return Err(LedgerError::Validation("amount must be positive".into()));
    }
    Ok(())
}

impl Persistable for WorldState {
    fn save(&self) -> Result<Vec<u8>, CodecError> {
        encode_snapshot(self)
    }

    fn load(blob: &[u8]) -> Result<Self, CodecError> {
        let state: WorldState = decode_snapshot(blob)?;
        let has_zero = state
            .accounts
            .values()
            .any(|a| a.balances.values().any(|v| *v == 0));
        if has_zero {
            return Err(CodecError::Corrupt("zero balance entry in snapshot".into()));
        }
        Ok(state)
    }
}
