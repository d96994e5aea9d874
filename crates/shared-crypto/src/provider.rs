//! Default `CryptoProvider`: SHA-256 hashing with Ed25519 signatures.

use crate::hashing::sha256;
use crate::signatures::Ed25519Scheme;
use shared_types::{Hash, Hasher, SignatureScheme, SigningError};

/// SHA-256 + Ed25519.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCrypto;

impl Hasher for DefaultCrypto {
    fn hash(&self, data: &[u8]) -> Hash {
        sha256(data)
    }
}

impl SignatureScheme for DefaultCrypto {
    fn sign(&self, private_key: &[u8], message: &[u8]) -> Result<Vec<u8>, SigningError> {
        Ed25519Scheme.sign(private_key, message)
    }

    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        Ed25519Scheme.verify(public_key, message, signature)
    }
}
