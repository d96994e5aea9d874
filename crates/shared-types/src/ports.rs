//! # Injected Ports
//!
//! The core never picks a hash function, signature algorithm or clock.
//! Concrete providers are handed in at construction time (see `shared-crypto`
//! for the defaults).

use crate::entities::{Hash, TimestampMs};
use crate::errors::SigningError;
use std::sync::atomic::{AtomicU64, Ordering};

/// `hash(bytes) -> 32-byte digest`.
pub trait Hasher: Send + Sync {
    /// Digest `data`.
    fn hash(&self, data: &[u8]) -> Hash;
}

/// `sign`/`verify` over opaque key and signature bytes.
///
/// Key and signature sizes are algorithm-defined, so they are byte slices
/// rather than fixed arrays.
pub trait SignatureScheme: Send + Sync {
    /// Sign `message` with `private_key`.
    fn sign(&self, private_key: &[u8], message: &[u8]) -> Result<Vec<u8>, SigningError>;

    /// Check `signature` over `message` against `public_key`. Malformed input is `false`.
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool;
}

/// A full cryptographic provider: hashing plus signatures.
pub trait CryptoProvider: Hasher + SignatureScheme {}

impl<T: Hasher + SignatureScheme> CryptoProvider for T {}

/// Time source for spending-limit windows and proposal timeouts.
pub trait TimeSource: Send + Sync {
    /// Current time in ms since the Unix epoch (UTC).
    fn now_ms(&self) -> TimestampMs;
}

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> TimestampMs {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as TimestampMs
    }
}

/// Manually driven clock for tests and deterministic replay.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now: AtomicU64,
}

impl ManualTimeSource {
    /// Start at `now_ms`.
    pub fn new(now_ms: TimestampMs) -> Self {
        Self {
            now: AtomicU64::new(now_ms),
        }
    }

    /// Jump to `now_ms`.
    pub fn set(&self, now_ms: TimestampMs) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    /// Move forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> TimestampMs {
        self.now.load(Ordering::SeqCst)
    }
}
