//! Signed disclosure report.
//!
//! A report reveals one ratchet link plus the period window it covers, so a
//! verifier can ratchet forward and recompute the TCNs broadcast in that
//! window. All integers are little-endian.
//!
//! ```text
//! offset  size  field
//! 0       32    RVK (report verification key)
//! 32      32    disclosed TCK
//! 64      2     start period (u16 LE)
//! 66      2     end period (u16 LE)
//! 68      2+n   memo (type, len, payload)
//! 70+n    64    Ed25519 signature over bytes [0, 70+n)
//! ```
//!
//! This module only handles layout. Signing and verification live with the
//! keys; this crate has no cryptographic dependencies.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{
    Memo,
    errors::{ProtocolError, Result},
};

/// Size of the RVK field
pub const RVK_SIZE: usize = 32;

/// Size of the disclosed TCK field
pub const TCK_SIZE: usize = 32;

/// Size of the trailing signature
pub const SIGNATURE_SIZE: usize = 64;

/// Fixed-size prefix before the memo: RVK, TCK, start and end periods
const FIXED_PREFIX_SIZE: usize = RVK_SIZE + TCK_SIZE + 2 + 2;

/// The signed portion of a report
///
/// Periods are 1-based: a link at chain index `i` is reported as period
/// `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBody {
    /// Reporter's verification key
    pub rvk: [u8; RVK_SIZE],
    /// Ratchet link at the start of the disclosed window
    pub tck: [u8; TCK_SIZE],
    /// First disclosed period
    pub start_period: u16,
    /// Last disclosed period
    pub end_period: u16,
    /// Attached memo
    pub memo: Memo,
}

impl ReportBody {
    /// Encoded size of the signed portion.
    pub fn encoded_len(&self) -> usize {
        FIXED_PREFIX_SIZE + self.memo.encoded_len()
    }

    /// Encode the signed portion into `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.rvk);
        dst.put_slice(&self.tck);
        dst.put_u16_le(self.start_period);
        dst.put_u16_le(self.end_period);
        self.memo.encode(dst);
    }

    /// The exact bytes the signature covers.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf.freeze()
    }
}

/// Complete report: signed body plus detached signature
///
/// # Invariants
///
/// - Encoded size is within [`Report::MIN_SIZE`, `Report::MAX_SIZE`]
/// - [`Report::decode`] is strict: the memo length byte must account for
///   every byte between the fixed prefix and the signature, so decoding then
///   encoding reproduces the input exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Signed portion
    pub body: ReportBody,
    /// Ed25519 signature over the encoded body
    pub signature: [u8; SIGNATURE_SIZE],
}

impl Report {
    /// Smallest valid report (empty memo)
    pub const MIN_SIZE: usize = FIXED_PREFIX_SIZE + Memo::HEADER_SIZE + SIGNATURE_SIZE;

    /// Largest valid report (255-byte memo payload)
    pub const MAX_SIZE: usize = Self::MIN_SIZE + Memo::MAX_PAYLOAD_SIZE;

    /// Encoded size.
    pub fn encoded_len(&self) -> usize {
        self.body.encoded_len() + SIGNATURE_SIZE
    }

    /// Encode into `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) {
        self.body.encode(dst);
        dst.put_slice(&self.signature);
    }

    /// Encode into a fresh buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        debug_assert_eq!(buf.len(), self.encoded_len());
        buf.freeze()
    }

    /// Decode a report from exactly `bytes`.
    ///
    /// Does not check the signature or the period window.
    ///
    /// # Errors
    ///
    /// - `ReportTooShort` / `ReportTooLong` if the size is out of range
    /// - `MemoTruncated` / `TrailingBytes` if the memo length byte disagrees
    ///   with the bytes between the fixed prefix and the signature
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::MIN_SIZE {
            return Err(ProtocolError::ReportTooShort { min: Self::MIN_SIZE, actual: bytes.len() });
        }
        if bytes.len() > Self::MAX_SIZE {
            return Err(ProtocolError::ReportTooLong { max: Self::MAX_SIZE, actual: bytes.len() });
        }

        let (signed, signature_bytes) = Self::split_signature(bytes)?;
        let (prefix, memo_bytes) = signed.split_at(FIXED_PREFIX_SIZE);

        let mut cursor = prefix;
        let mut rvk = [0u8; RVK_SIZE];
        cursor.copy_to_slice(&mut rvk);
        let mut tck = [0u8; TCK_SIZE];
        cursor.copy_to_slice(&mut tck);
        let start_period = cursor.get_u16_le();
        let end_period = cursor.get_u16_le();
        debug_assert!(cursor.is_empty());

        let memo = Memo::decode(memo_bytes)?;

        let mut signature = [0u8; SIGNATURE_SIZE];
        signature.copy_from_slice(signature_bytes);

        Ok(Self { body: ReportBody { rvk, tck, start_period, end_period, memo }, signature })
    }

    /// Split raw report bytes into the signed portion and the signature.
    ///
    /// # Errors
    ///
    /// - `ReportTooShort` if there is no room for the fixed prefix, memo
    ///   header and signature
    pub fn split_signature(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
        if bytes.len() < Self::MIN_SIZE {
            return Err(ProtocolError::ReportTooShort { min: Self::MIN_SIZE, actual: bytes.len() });
        }
        Ok(bytes.split_at(bytes.len() - SIGNATURE_SIZE))
    }
}
