//! # Error Types
//!
//! Errors raised by the shared ports and the snapshot codec.

use thiserror::Error;

/// Errors raised while encoding or decoding a persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Value could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Payload could not be deserialized.
    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    /// Blob is shorter than the snapshot header.
    #[error("Snapshot truncated: {len} bytes, header needs {needed}")]
    Truncated { len: usize, needed: usize },

    /// Blob does not start with the snapshot magic.
    #[error("Bad snapshot magic")]
    BadMagic,

    /// Snapshot written by an unknown format version.
    #[error("Unsupported snapshot version: found {found}, supported {supported}")]
    UnsupportedVersion { found: u16, supported: u16 },

    /// Payload checksum does not match the header.
    #[error("Snapshot checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Payload decoded but violates an invariant of the restored value.
    #[error("Snapshot content corrupt: {0}")]
    Corrupt(String),
}

/// Error returned by a [`SignatureScheme`](crate::SignatureScheme) that cannot sign.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Signing failed: {0}")]
pub struct SigningError(pub String);
