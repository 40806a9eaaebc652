//! Report authentication (RAK) and verification (RVK) keys.
//!
//! Thin wrappers over `ed25519-dalek` that fix the key and signature sizes
//! used on the wire and keep the secret half out of `Debug` output.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};

use super::error::CryptoError;

/// Size of both RAK and RVK in bytes
pub const KEY_SIZE: usize = 32;

/// Size of an Ed25519 signature in bytes
pub const SIGNATURE_SIZE: usize = 64;

/// Report authentication key (RAK).
///
/// The 32-byte Ed25519 seed. Signs reports and roots the ratchet through
/// `TCK₀`. The underlying signing key is zeroized on drop.
pub struct ReportAuthenticationKey {
    signing_key: SigningKey,
}

impl ReportAuthenticationKey {
    /// Build a RAK from a 32-byte seed.
    pub fn from_bytes(seed: &[u8; KEY_SIZE]) -> Self {
        Self { signing_key: SigningKey::from_bytes(seed) }
    }

    /// Derive the public verification key (RVK).
    pub fn verification_key(&self) -> ReportVerificationKey {
        ReportVerificationKey { key: self.signing_key.verifying_key() }
    }

    /// Sign `message`, returning the detached 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_SIZE] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Raw seed bytes. Only `TCK₀` derivation reads these.
    pub(crate) fn seed(&self) -> &[u8; KEY_SIZE] {
        self.signing_key.as_bytes()
    }
}

impl fmt::Debug for ReportAuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportAuthenticationKey").finish_non_exhaustive()
    }
}

/// Report verification key (RVK).
///
/// Public. Embedded in every report and mixed into every ratchet step after
/// `TCK₀`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportVerificationKey {
    key: VerifyingKey,
}

impl ReportVerificationKey {
    /// Parse an RVK read off the wire.
    ///
    /// # Errors
    ///
    /// - `InvalidVerificationKey`: bytes are not a valid curve point
    pub fn from_bytes(bytes: &[u8; KEY_SIZE]) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(bytes)
            .map(|key| Self { key })
            .map_err(|_| CryptoError::InvalidVerificationKey)
    }

    /// Compressed key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        self.key.as_bytes()
    }

    /// Compressed key bytes, by value.
    pub fn to_bytes(&self) -> [u8; KEY_SIZE] {
        self.key.to_bytes()
    }

    /// Verify a detached signature over `message`.
    ///
    /// Uses strict verification: small-order keys and non-canonical
    /// signatures are rejected.
    ///
    /// # Errors
    ///
    /// - `SignatureInvalid`: signature does not match `message` under this key
    pub fn verify(
        &self,
        message: &[u8],
        signature: &[u8; SIGNATURE_SIZE],
    ) -> Result<(), CryptoError> {
        let signature = Signature::from_bytes(signature);
        self.key.verify_strict(message, &signature).map_err(|_| CryptoError::SignatureInvalid)
    }
}

impl fmt::Display for ReportVerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}
