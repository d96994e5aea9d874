//! # Persistence Port
//!
//! `save(state) -> blob`, `load(blob) -> state`. Storage backends are
//! injected through [`SnapshotStore`]; this module only fixes the envelope.
//!
//! ## Snapshot Envelope
//!
//! ```text
//! ┌──────────┬─────────────┬──────────────┬─────────────────┐
//! │ "QCSN"   │ version u16 │ crc32 u32    │ bincode payload │
//! │ 4 bytes  │ big-endian  │ big-endian   │                 │
//! └──────────┴─────────────┴──────────────┴─────────────────┘
//! ```

use crate::errors::CodecError;
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

const SNAPSHOT_MAGIC: [u8; 4] = *b"QCSN";
const HEADER_LEN: usize = 4 + 2 + 4;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// A value with a lossless snapshot form.
pub trait Persistable: Sized {
    /// Encode into a self-checking blob.
    fn save(&self) -> Result<Vec<u8>, CodecError>;

    /// Restore from a blob produced by [`Persistable::save`].
    fn load(blob: &[u8]) -> Result<Self, CodecError>;
}

/// Wrap `value` in the snapshot envelope.
pub fn encode_snapshot<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    let payload = bincode::serialize(value).map_err(|e| CodecError::Serialization(e.to_string()))?;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&SNAPSHOT_MAGIC);
    out.extend_from_slice(&SNAPSHOT_VERSION.to_be_bytes());
    out.extend_from_slice(&crc32fast::hash(&payload).to_be_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Check the envelope and decode its payload.
pub fn decode_snapshot<T: DeserializeOwned>(blob: &[u8]) -> Result<T, CodecError> {
    if blob.len() < HEADER_LEN {
        return Err(CodecError::Truncated {
            len: blob.len(),
            needed: HEADER_LEN,
        });
    }
    if blob[..4] != SNAPSHOT_MAGIC {
        return Err(CodecError::BadMagic);
    }
    let version = u16::from_be_bytes([blob[4], blob[5]]);
    if version != SNAPSHOT_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: version,
            supported: SNAPSHOT_VERSION,
        });
    }
    let expected = u32::from_be_bytes([blob[6], blob[7], blob[8], blob[9]]);
    let payload = &blob[HEADER_LEN..];
    let actual = crc32fast::hash(payload);
    if expected != actual {
        return Err(CodecError::ChecksumMismatch { expected, actual });
    }
    bincode::deserialize(payload).map_err(|e| CodecError::Deserialization(e.to_string()))
}

/// Key/blob storage backend.
pub trait SnapshotStore: Send + Sync {
    /// Store `blob` under `key`, replacing any previous value.
    fn put(&self, key: &str, blob: Vec<u8>) -> Result<(), CodecError>;

    /// Fetch the blob stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CodecError>;
}

/// In-memory snapshot store for tests and single-process nodes.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn put(&self, key: &str, blob: Vec<u8>) -> Result<(), CodecError> {
        self.blobs.write().insert(key.to_string(), blob);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CodecError> {
        Ok(self.blobs.read().get(key).cloned())
    }
}
