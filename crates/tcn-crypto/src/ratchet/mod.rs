//! TCK hash ratchet and TCN derivation.

mod chain;
mod error;
mod keys;
mod number;

pub use chain::{TCK_SIZE, TemporaryContactKey, recompute_tcns};
pub use error::CryptoError;
pub use keys::{KEY_SIZE, ReportAuthenticationKey, ReportVerificationKey, SIGNATURE_SIZE};
pub use number::{TCN_SIZE, TemporaryContactNumber};
