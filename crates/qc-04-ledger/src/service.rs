//! # Ledger Service
//!
//! Owns one [`WorldState`] behind a single `RwLock`. Every call is a short
//! critical section; writes are serialized, so `apply_transaction` calls
//! observe one global order.

use crate::domain::{
    BatchReceipt, FailurePolicy, LedgerError, LedgerResult, SpendingLimit, TxReceipt, WorldState,
};
use crate::ports::LedgerApi;
use parking_lot::RwLock;
use shared_types::{
    short_hex, Address, Amount, AssetId, Hash, Hasher, Nonce, Persistable, Role, TimeSource,
    TimestampMs, Transaction,
};
use std::sync::Arc;

pub struct Ledger {
    state: RwLock<WorldState>,
    hasher: Arc<dyn Hasher>,
    time_source: Arc<dyn TimeSource>,
}

impl Ledger {
    pub fn new(hasher: Arc<dyn Hasher>, time_source: Arc<dyn TimeSource>) -> Self {
        Self::with_state(WorldState::new(), hasher, time_source)
    }

    pub fn with_state(
        state: WorldState,
        hasher: Arc<dyn Hasher>,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            state: RwLock::new(state),
            hasher,
            time_source,
        }
    }

    /// Rebuild a ledger from a [`Ledger::snapshot`] blob.
    pub fn restore(
        blob: &[u8],
        hasher: Arc<dyn Hasher>,
        time_source: Arc<dyn TimeSource>,
    ) -> LedgerResult<Self> {
        let state = WorldState::load(blob)?;
        tracing::info!(
            "[qc-04] Restored ledger snapshot: {} accounts",
            state.account_count()
        );
        Ok(Self::with_state(state, hasher, time_source))
    }

    // === Reads ===

    pub fn get_balance(&self, address: &Address, asset: AssetId) -> Amount {
        self.state.read().get_balance(address, asset)
    }

    pub fn get_nonce(&self, address: &Address) -> Nonce {
        self.state.read().get_nonce(address)
    }

    pub fn role(&self, address: &Address) -> Option<Role> {
        self.state.read().role(address)
    }

    pub fn spending_limit(&self, address: &Address) -> Option<SpendingLimit> {
        self.state.read().spending_limit(address).cloned()
    }

    pub fn total_supply(&self, asset: AssetId) -> Amount {
        self.state.read().total_supply(asset)
    }

    pub fn account_count(&self) -> usize {
        self.state.read().account_count()
    }

    /// Copy of the current state.
    pub fn state(&self) -> WorldState {
        self.state.read().clone()
    }

    pub fn state_root(&self) -> LedgerResult<Hash> {
        self.state.read().state_root(self.hasher.as_ref())
    }

    pub fn snapshot(&self) -> LedgerResult<Vec<u8>> {
        Ok(self.state.read().save()?)
    }

    // === Direct writes (genesis and tests) ===

    pub fn set_balance(&self, address: Address, asset: AssetId, amount: Amount) {
        self.state.write().set_balance(address, asset, amount);
    }

    pub fn transfer(
        &self,
        from: Address,
        to: Address,
        asset: AssetId,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.state.write().transfer(from, to, asset, amount)
    }

    /// Genesis allocation. No capability check.
    pub fn mint_genesis(&self, to: Address, asset: AssetId, amount: Amount) -> LedgerResult<()> {
        self.state.write().mint(to, asset, amount)?;
        tracing::info!(
            "[qc-04] Genesis allocation: {} of asset {} to 0x{}",
            amount,
            asset,
            short_hex(&to)
        );
        Ok(())
    }

    pub fn grant_role(&self, account: Address, role: Role) {
        self.state.write().grant_role(account, role);
    }

    // === Transactions ===

    pub fn apply_transaction(&self, tx: &Transaction) -> LedgerResult<TxReceipt> {
        self.apply_transaction_at(tx, self.time_source.now_ms())
    }

    pub fn apply_transaction_at(
        &self,
        tx: &Transaction,
        now_ms: TimestampMs,
    ) -> LedgerResult<TxReceipt> {
        let result = self.state.write().apply_transaction_at(tx, now_ms);
        match &result {
            Ok(receipt) => tracing::debug!(
                "[qc-04] Applied {} from 0x{} (nonce {})",
                receipt.kind,
                short_hex(&tx.from),
                receipt.nonce
            ),
            Err(e) => tracing::warn!(
                "[qc-04] Rejected {} from 0x{}: {}",
                tx.kind(),
                short_hex(&tx.from),
                e
            ),
        }
        result
    }

    pub fn apply_batch(
        &self,
        txs: &[Transaction],
        now_ms: TimestampMs,
        policy: FailurePolicy,
    ) -> LedgerResult<BatchReceipt> {
        let result = self.state.write().apply_batch(txs, now_ms, policy);
        match &result {
            Ok(receipt) => {
                tracing::debug!(
                    "[qc-04] Batch applied: {} ok, {} skipped",
                    receipt.applied.len(),
                    receipt.skipped.len()
                );
                for (index, e) in &receipt.skipped {
                    tracing::warn!("[qc-04] Skipped transaction {}: {}", index, e);
                }
            }
            Err(LedgerError::BlockAborted { index, source }) => {
                tracing::warn!("[qc-04] Batch aborted at transaction {}: {}", index, source)
            }
            Err(e) => tracing::warn!("[qc-04] Batch failed: {}", e),
        }
        result
    }
}

impl LedgerApi for Ledger {
    fn get_balance(&self, address: &Address, asset: AssetId) -> Amount {
        Ledger::get_balance(self, address, asset)
    }

    fn get_nonce(&self, address: &Address) -> Nonce {
        Ledger::get_nonce(self, address)
    }

    fn total_supply(&self, asset: AssetId) -> Amount {
        Ledger::total_supply(self, asset)
    }

    fn apply_transaction(&self, tx: &Transaction) -> LedgerResult<TxReceipt> {
        Ledger::apply_transaction(self, tx)
    }

    fn apply_transaction_at(
        &self,
        tx: &Transaction,
        now_ms: TimestampMs,
    ) -> LedgerResult<TxReceipt> {
        Ledger::apply_transaction_at(self, tx, now_ms)
    }

    fn apply_batch(
        &self,
        txs: &[Transaction],
        now_ms: TimestampMs,
        policy: FailurePolicy,
    ) -> LedgerResult<BatchReceipt> {
        Ledger::apply_batch(self, txs, now_ms, policy)
    }

    fn state_root(&self) -> LedgerResult<Hash> {
        Ledger::state_root(self)
    }

    fn snapshot(&self) -> LedgerResult<Vec<u8>> {
        Ledger::snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::Sha256Hasher;
    use shared_types::{CodecError, ManualTimeSource, TxAction, NATIVE_ASSET};

    const A: Address = [0xA; 20];
    const B: Address = [0xB; 20];
    // 2025-01-15T10:00:00Z
    const JAN_15_10H: TimestampMs = 1_736_935_200_000;
    const HOUR: u64 = 3_600_000;

    fn ledger_at(now: TimestampMs) -> (Ledger, Arc<ManualTimeSource>) {
        let clock = Arc::new(ManualTimeSource::new(now));
        let ledger = Ledger::new(Arc::new(Sha256Hasher), clock.clone());
        (ledger, clock)
    }

    #[test]
    fn test_insufficient_funds_scenario() {
        let (ledger, _) = ledger_at(JAN_15_10H);
        ledger.set_balance(A, 1, 1000);

        let err = ledger.transfer(A, B, 1, 1200).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientFunds {
                required: 1200,
                available: 1000,
                ..
            }
        ));
        assert_eq!(ledger.get_balance(&A, 1), 1000);
    }

    #[test]
    fn test_nonce_replay_scenario() {
        let (ledger, _) = ledger_at(JAN_15_10H);
        ledger.set_balance(A, NATIVE_ASSET, 1000);
        let tx = Transaction::transfer(A, B, NATIVE_ASSET, 100, 1);

        ledger.apply_transaction(&tx).unwrap();
        assert_eq!(ledger.get_balance(&A, NATIVE_ASSET), 900);
        assert_eq!(ledger.get_nonce(&A), 1);

        assert!(matches!(
            ledger.apply_transaction(&tx),
            Err(LedgerError::InvalidNonce {
                expected: 2,
                actual: 1
            })
        ));
        assert_eq!(ledger.get_balance(&A, NATIVE_ASSET), 900);
    }

    #[test]
    fn test_apply_transaction_uses_injected_clock() {
        let (ledger, clock) = ledger_at(JAN_15_10H);
        ledger.set_balance(A, NATIVE_ASSET, 1000);
        let set = Transaction {
            from: A,
            nonce: 1,
            action: TxAction::SetSpendingLimit {
                daily_limit: 100,
                monthly_limit: 0,
            },
        };
        ledger.apply_transaction(&set).unwrap();
        ledger
            .apply_transaction(&Transaction::transfer(A, B, NATIVE_ASSET, 100, 2))
            .unwrap();
        assert!(ledger
            .apply_transaction(&Transaction::transfer(A, B, NATIVE_ASSET, 1, 3))
            .is_err());

        // Next UTC day.
        clock.advance(14 * HOUR);
        ledger
            .apply_transaction(&Transaction::transfer(A, B, NATIVE_ASSET, 100, 3))
            .unwrap();
        assert_eq!(ledger.get_balance(&B, NATIVE_ASSET), 200);
    }

    #[test]
    fn test_snapshot_restore_preserves_root() {
        let (ledger, clock) = ledger_at(JAN_15_10H);
        ledger.mint_genesis(A, NATIVE_ASSET, 5_000).unwrap();
        ledger.grant_role(A, Role::Owner);
        ledger
            .apply_transaction(&Transaction::transfer(A, B, NATIVE_ASSET, 250, 1))
            .unwrap();

        let restored =
            Ledger::restore(&ledger.snapshot().unwrap(), Arc::new(Sha256Hasher), clock).unwrap();
        assert_eq!(restored.state_root().unwrap(), ledger.state_root().unwrap());
        assert_eq!(restored.get_nonce(&A), 1);
        assert_eq!(restored.role(&A), Some(Role::Owner));
        assert_eq!(restored.account_count(), 2);
    }

    #[test]
    fn test_restore_rejects_corrupt_blob() {
        let (ledger, clock) = ledger_at(JAN_15_10H);
        ledger.set_balance(A, 1, 10);
        let mut blob = ledger.snapshot().unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0xff;

        let err = Ledger::restore(&blob, Arc::new(Sha256Hasher), clock)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            LedgerError::Codec(CodecError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_batch_through_api_trait() {
        let (ledger, _) = ledger_at(JAN_15_10H);
        ledger.set_balance(A, NATIVE_ASSET, 300);
        let api: &dyn LedgerApi = &ledger;
        let txs = vec![
            Transaction::transfer(A, B, NATIVE_ASSET, 100, 1),
            Transaction::transfer(A, B, NATIVE_ASSET, 100, 2),
        ];
        let receipt = api
            .apply_batch(&txs, JAN_15_10H, FailurePolicy::AbortBlock)
            .unwrap();
        assert!(receipt.is_complete());
        assert_eq!(api.get_balance(&B, NATIVE_ASSET), 200);
        assert_eq!(api.total_supply(NATIVE_ASSET), 300);
    }

    #[test]
    fn test_concurrent_transfers_serialize() {
        let (ledger, _) = ledger_at(JAN_15_10H);
        let ledger = Arc::new(ledger);
        for i in 0..8u8 {
            ledger.set_balance([i; 20], NATIVE_ASSET, 1_000);
        }

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let ledger = ledger.clone();
                std::thread::spawn(move || {
                    for n in 1..=50u64 {
                        let to = [(i + 1) % 8; 20];
                        let _ = ledger.apply_transaction(&Transaction::transfer(
                            [i; 20],
                            to,
                            NATIVE_ASSET,
                            7,
                            n,
                        ));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(ledger.total_supply(NATIVE_ASSET), 8_000);
        for i in 0..8u8 {
            assert_eq!(ledger.get_nonce(&[i; 20]), 50);
        }
    }
}
