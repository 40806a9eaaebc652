//! Memo attached to a disclosure report.
//!
//! Layout: `[type: u8] [len: u8] [payload: len bytes]`. The memo carries
//! whatever the reporting application wants to say about the report; the
//! ratchet never looks inside.

use bytes::{BufMut, Bytes};

use crate::errors::{ProtocolError, Result};

/// Memo format tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoType {
    /// Symptom report, version 1 (`0x00`)
    SymptomReportV1,
    /// Any tag this crate does not know. Kept so verifiers can still check
    /// the signature and skip the payload.
    Unknown(u8),
}

impl MemoType {
    /// Wire tag for this memo type.
    pub fn to_u8(self) -> u8 {
        match self {
            Self::SymptomReportV1 => 0x00,
            Self::Unknown(tag) => tag,
        }
    }

    /// Memo type for a wire tag.
    pub fn from_u8(tag: u8) -> Self {
        match tag {
            0x00 => Self::SymptomReportV1,
            other => Self::Unknown(other),
        }
    }
}

/// Tagged, length-prefixed report memo
///
/// # Invariants
///
/// - `payload.len() <= Memo::MAX_PAYLOAD_SIZE`, enforced by [`Memo::new`] and
///   [`Memo::decode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memo {
    memo_type: MemoType,
    payload: Bytes,
}

impl Memo {
    /// Size of the memo header (type + length)
    pub const HEADER_SIZE: usize = 2;

    /// Largest payload the one-byte length field can describe
    pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

    /// Build a memo.
    ///
    /// # Errors
    ///
    /// - `MemoTooLong` if the payload exceeds 255 bytes
    pub fn new(memo_type: MemoType, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::MemoTooLong {
                size: payload.len(),
                max: Self::MAX_PAYLOAD_SIZE,
            });
        }
        // Unknown(0x00) and SymptomReportV1 share a tag; keep the canonical form
        Ok(Self { memo_type: MemoType::from_u8(memo_type.to_u8()), payload })
    }

    /// Build a symptom report v1 memo.
    pub fn symptom_report(payload: impl Into<Bytes>) -> Result<Self> {
        Self::new(MemoType::SymptomReportV1, payload)
    }

    /// Format tag.
    pub fn memo_type(&self) -> MemoType {
        self.memo_type
    }

    /// Raw payload bytes.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Encoded size (header plus payload).
    pub fn encoded_len(&self) -> usize {
        Self::HEADER_SIZE + self.payload.len()
    }

    /// Encode into `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) {
        debug_assert!(self.payload.len() <= Self::MAX_PAYLOAD_SIZE);

        dst.put_u8(self.memo_type.to_u8());
        dst.put_u8(self.payload.len() as u8);
        dst.put_slice(&self.payload);
    }

    /// Decode a memo that occupies exactly `bytes`.
    ///
    /// # Errors
    ///
    /// - `MemoTruncated` if the header or payload is cut short
    /// - `TrailingBytes` if bytes remain after the payload
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let [tag, len, payload @ ..] = bytes else {
            return Err(ProtocolError::MemoTruncated {
                expected: Self::HEADER_SIZE,
                actual: bytes.len(),
            });
        };

        let expected = usize::from(*len);
        if payload.len() < expected {
            return Err(ProtocolError::MemoTruncated { expected, actual: payload.len() });
        }
        if payload.len() > expected {
            return Err(ProtocolError::TrailingBytes { count: payload.len() - expected });
        }

        Ok(Self { memo_type: MemoType::from_u8(*tag), payload: Bytes::copy_from_slice(payload) })
    }
}
