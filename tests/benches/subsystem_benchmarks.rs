//! # Quantum-Ledger Subsystem Benchmarks
//!
//! | Subsystem | Operation |
//! |-----------|-----------|
//! | qc-02 Block Log | checked append |
//! | qc-04 Ledger | ordered batch replay, state root |
//! | qc-08 Consensus | propose + signed votes to finality |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_02_block_log::{BlockLog, BlockLogConfig};
use qc_04_ledger::{FailurePolicy, Ledger};
use qc_08_consensus::{ConsensusConfig, ConsensusEngine, SignedVote, ValidatorInfo};
use rand::Rng;
use shared_crypto::{DefaultCrypto, Ed25519KeyPair, Ed25519Scheme, Sha256Hasher};
use shared_types::{Address, ManualTimeSource, Transaction, NATIVE_ASSET};
use std::sync::Arc;
use std::time::Duration;

const T0: u64 = 1_736_935_200_000;

// ============================================================================
// QC-04: Ledger
// ============================================================================

fn bench_ledger_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-04-ledger");
    group.measurement_time(Duration::from_secs(5));

    for size in [10usize, 100, 1_000] {
        let mut rng = rand::thread_rng();
        let sender: Address = [0x01; 20];
        let txs: Vec<Transaction> = (0..size)
            .map(|i| {
                let mut to = [0u8; 20];
                rng.fill(&mut to);
                Transaction::transfer(sender, to, NATIVE_ASSET, rng.gen_range(1..100), i as u64 + 1)
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("apply_batch", size), &txs, |b, txs| {
            b.iter_batched(
                || {
                    let ledger =
                        Ledger::new(Arc::new(Sha256Hasher), Arc::new(ManualTimeSource::new(T0)));
                    ledger.set_balance(sender, NATIVE_ASSET, u64::MAX as u128);
                    ledger
                },
                |ledger| {
                    black_box(
                        ledger
                            .apply_batch(txs, T0, FailurePolicy::AbortBlock)
                            .is_ok(),
                    )
                },
                criterion::BatchSize::SmallInput,
            )
        });

        let ledger = Ledger::new(Arc::new(Sha256Hasher), Arc::new(ManualTimeSource::new(T0)));
        ledger.set_balance(sender, NATIVE_ASSET, u64::MAX as u128);
        let _ = ledger.apply_batch(&txs, T0, FailurePolicy::AbortBlock);
        group.bench_with_input(BenchmarkId::new("state_root", size), &ledger, |b, ledger| {
            b.iter(|| black_box(ledger.state_root().is_ok()))
        });
    }
    group.finish();
}

// ============================================================================
// QC-02: Block Log
// ============================================================================

fn bench_block_log_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-02-block-log");
    let log = BlockLog::new(Arc::new(Sha256Hasher), BlockLogConfig::default());
    let data = [0x42u8; 104];

    group.bench_function("append_checked", |b| {
        b.iter(|| {
            let parent = log.get_last_hash();
            black_box(log.append(parent, &data).is_ok())
        })
    });
    group.finish();
}

// ============================================================================
// QC-08: Consensus
// ============================================================================

fn bench_consensus_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-08-consensus");

    for n in [4u8, 16, 64] {
        let keys: Vec<Ed25519KeyPair> = (1..=n).map(|i| Ed25519KeyPair::from_seed([i; 32])).collect();
        let infos: Vec<ValidatorInfo> = keys
            .iter()
            .map(|k| {
                let id = *k.public_key().as_bytes();
                ValidatorInfo::new(id, id.to_vec())
            })
            .collect();
        let clock = Arc::new(ManualTimeSource::new(T0));
        let engine = ConsensusEngine::initialize(
            infos.clone(),
            ConsensusConfig::default(),
            Arc::new(DefaultCrypto),
            clock,
        )
        .unwrap();
        let mut round = 0u64;

        group.bench_with_input(BenchmarkId::new("finalize_signed", n), &n, |b, _| {
            b.iter(|| {
                round += 1;
                let hash = engine
                    .propose_block(&infos[0].id, &round.to_be_bytes())
                    .unwrap();
                for (key, info) in keys.iter().zip(&infos) {
                    let vote =
                        SignedVote::sign(&Ed25519Scheme, &key.to_seed(), hash, info.id, true)
                            .unwrap();
                    if engine.vote_signed(&vote).unwrap().is_finalized() {
                        break;
                    }
                }
                black_box(engine.take_finalized().len())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_ledger_batch,
    bench_block_log_append,
    bench_consensus_round
);
criterion_main!(benches);
