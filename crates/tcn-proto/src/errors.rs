//! Error types for report and memo parsing.

use thiserror::Error;

/// Result alias for wire-format operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Structural errors in a report or memo.
///
/// These only describe byte layout. A structurally valid report may still
/// carry a bad signature; that is checked by the verifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Fewer bytes than the smallest possible report
    #[error("report too short: expected at least {min} bytes, got {actual}")]
    ReportTooShort {
        /// Minimum report size
        min: usize,
        /// Bytes available
        actual: usize,
    },

    /// More bytes than the largest possible report
    #[error("report too long: expected at most {max} bytes, got {actual}")]
    ReportTooLong {
        /// Maximum report size
        max: usize,
        /// Bytes available
        actual: usize,
    },

    /// Memo length byte claims more payload than is present
    #[error("memo truncated: header claims {expected} payload bytes, got {actual}")]
    MemoTruncated {
        /// Payload length from the memo header
        expected: usize,
        /// Payload bytes actually present
        actual: usize,
    },

    /// Bytes left over after the memo payload
    #[error("{count} trailing bytes after memo payload")]
    TrailingBytes {
        /// Number of unexpected bytes
        count: usize,
    },

    /// Memo payload does not fit the one-byte length field
    #[error("memo payload too long: {size} bytes (max {max})")]
    MemoTooLong {
        /// Requested payload size
        size: usize,
        /// Largest encodable payload
        max: usize,
    },
}
