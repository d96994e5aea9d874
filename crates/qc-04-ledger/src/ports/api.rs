use crate::domain::{BatchReceipt, FailurePolicy, LedgerResult, TxReceipt};
use shared_types::{Address, Amount, AssetId, Hash, Nonce, TimestampMs, Transaction};

/// Primary API for ledger operations.
///
/// Implemented by [`crate::Ledger`]; the block-production applier holds it
/// as `Arc<dyn LedgerApi>`.
pub trait LedgerApi: Send + Sync {
    // === Reads ===

    fn get_balance(&self, address: &Address, asset: AssetId) -> Amount;

    fn get_nonce(&self, address: &Address) -> Nonce;

    fn total_supply(&self, asset: AssetId) -> Amount;

    // === Writes ===

    /// Apply one transaction at the injected clock's current time.
    fn apply_transaction(&self, tx: &Transaction) -> LedgerResult<TxReceipt>;

    /// Apply one transaction at an explicit time.
    fn apply_transaction_at(&self, tx: &Transaction, now_ms: TimestampMs)
        -> LedgerResult<TxReceipt>;

    /// Apply an ordered batch under one lock scope.
    fn apply_batch(
        &self,
        txs: &[Transaction],
        now_ms: TimestampMs,
        policy: FailurePolicy,
    ) -> LedgerResult<BatchReceipt>;

    // === State Root / Persistence ===

    fn state_root(&self) -> LedgerResult<Hash>;

    fn snapshot(&self) -> LedgerResult<Vec<u8>>;
}
