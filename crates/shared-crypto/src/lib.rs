//! # Shared Crypto - Default Providers
//!
//! Concrete implementations of the `Hasher` and `SignatureScheme` ports from
//! `shared-types`. The ledger, consensus engine and block log only see the
//! traits; any other algorithm can be substituted.
//!
//! ## Components
//!
//! | Module | Algorithm | Port |
//! |--------|-----------|------|
//! | `hashing` | SHA-256, BLAKE3 | `Hasher` |
//! | `signatures` | Ed25519 | `SignatureScheme` |
//! | `provider` | SHA-256 + Ed25519 | `CryptoProvider` |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod provider;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{blake3_hash, sha256, Blake3Hasher, Sha256Hasher};
pub use provider::DefaultCrypto;
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Scheme, Ed25519Signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
