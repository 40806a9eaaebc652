//! Errors from key parsing and signature verification.

use thiserror::Error;

/// Errors raised by the TCN cryptographic primitives.
///
/// Derivation itself is infallible; only untrusted input (keys and
/// signatures read off the wire) can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The 32 bytes do not decode to a valid Ed25519 public key
    #[error("invalid report verification key: not a valid Ed25519 point")]
    InvalidVerificationKey,

    /// Signature does not verify under the given key
    #[error("report signature verification failed")]
    SignatureInvalid,
}
