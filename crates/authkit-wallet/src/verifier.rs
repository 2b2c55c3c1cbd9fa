//! Signature verification.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Verifies a detached signature against a public key.
///
/// Implementations return `false` for any malformed key or signature rather
/// than erroring; a bad proof is simply unverified.
pub trait SignatureVerifier: Send + Sync {
    /// Returns `true` if `signature` is a valid signature of `message` by
    /// `public_key`.
    fn verify_detached(&self, message: &[u8], signature: &[u8], public_key: &[u8; 32]) -> bool;
}

/// Ed25519 verification, as used by Solana wallets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify_detached(&self, message: &[u8], signature: &[u8], public_key: &[u8; 32]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(public_key) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        key.verify(message, &signature).is_ok()
    }
}
