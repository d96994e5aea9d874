//! # Hashing
//!
//! SHA-256 (the default, matching the reference chain's block hashes) and
//! BLAKE3 (faster, SIMD-accelerated). Both implement the `Hasher` port.

use sha2::{Digest, Sha256};
use shared_types::{Hash, Hasher};

/// SHA-256 one-shot.
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// BLAKE3 one-shot.
pub fn blake3_hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// SHA-256 `Hasher`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash(&self, data: &[u8]) -> Hash {
        sha256(data)
    }
}

/// BLAKE3 `Hasher`, optionally keyed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3Hasher {
    key: Option<[u8; 32]>,
}

impl Blake3Hasher {
    /// Unkeyed hasher.
    pub fn new() -> Self {
        Self { key: None }
    }

    /// Keyed hasher (MAC mode). Separates hash domains between networks.
    pub fn new_keyed(key: [u8; 32]) -> Self {
        Self { key: Some(key) }
    }
}

impl Hasher for Blake3Hasher {
    fn hash(&self, data: &[u8]) -> Hash {
        match &self.key {
            Some(key) => *blake3::keyed_hash(key, data).as_bytes(),
            None => blake3_hash(data),
        }
    }
}
