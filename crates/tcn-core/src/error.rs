//! Error types for the ratchet engine and report verifier.

use tcn_crypto::CryptoError;
use tcn_proto::ProtocolError;
use thiserror::Error;

/// Errors from [`crate::RatchetEngine`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The random source could not produce the RAK seed. Fatal: an engine
    /// without secure entropy must not be built.
    #[error("configuration error: {reason}")]
    Configuration {
        /// Underlying RNG failure
        reason: String,
    },

    /// A report was requested before any TCN was issued, so there is nothing
    /// past `TCK₀` to disclose
    #[error("disclosure not ready: no TCN has been issued yet")]
    DisclosureNotReady,

    /// The 16-bit period space is used up
    #[error("ratchet exhausted: chain index cannot exceed {max_index}")]
    RatchetExhausted {
        /// Largest chain index this engine can issue
        max_index: u16,
    },
}

impl EngineError {
    /// Returns true if the same call may succeed later without rebuilding the
    /// engine.
    ///
    /// Only `DisclosureNotReady` qualifies: it clears after one `new_tcn()`.
    /// Configuration and exhaustion errors are permanent for this engine.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DisclosureNotReady)
    }
}

/// Reasons a report is rejected by [`crate::ReportVerifier`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Report bytes are structurally invalid
    #[error("malformed report: {0}")]
    Protocol(#[from] ProtocolError),

    /// Embedded key is invalid or the signature does not verify
    #[error("report authentication failed: {0}")]
    Crypto(#[from] CryptoError),

    /// Period window is empty or starts before period 1
    #[error("invalid disclosure window: start period {start}, end period {end}")]
    InvalidPeriods {
        /// Start period as read from the report
        start: u16,
        /// End period as read from the report
        end: u16,
    },
}
