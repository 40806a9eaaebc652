//! Temporary contact keys and the one-way ratchet step
//!
//! # Security Properties
//!
//! - One-wayness: `TCKⱼ` reveals nothing about `TCKⱼ₋₁`
//! - Seed isolation: only `TCK₀` is derived from RAK
//! - Determinism: the same RAK always yields the same chain

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::{
    keys::{ReportAuthenticationKey, ReportVerificationKey},
    number::TemporaryContactNumber,
};

/// Domain separation label for chain links
const TCK_LABEL: &[u8] = b"H_TCK";

/// Size of a temporary contact key in bytes
pub const TCK_SIZE: usize = 32;

/// One link of the ratchet chain.
///
/// Secret until disclosed in a report. Disclosing `TCKⱼ` lets anyone derive
/// `TCKⱼ₊₁, TCKⱼ₊₂, …` (given the RVK) but not any earlier link.
#[derive(Clone, PartialEq, Eq)]
pub struct TemporaryContactKey {
    bytes: [u8; TCK_SIZE],
}

impl TemporaryContactKey {
    /// Derive `TCK₀ = H("H_TCK" ‖ RAK)`.
    pub fn initial(rak: &ReportAuthenticationKey) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(TCK_LABEL);
        hasher.update(rak.seed());
        Self { bytes: hasher.finalize().into() }
    }

    /// Wrap a link read off the wire.
    pub fn from_bytes(bytes: [u8; TCK_SIZE]) -> Self {
        Self { bytes }
    }

    /// Raw link bytes.
    pub fn as_bytes(&self) -> &[u8; TCK_SIZE] {
        &self.bytes
    }

    /// Advance one step: `TCKⱼ₊₁ = H("H_TCK" ‖ RVK ‖ TCKⱼ)`.
    ///
    /// Depends only on the public RVK and this link, never on RAK.
    #[must_use]
    pub fn ratchet(&self, rvk: &ReportVerificationKey) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(TCK_LABEL);
        hasher.update(rvk.as_bytes());
        hasher.update(self.bytes);
        Self { bytes: hasher.finalize().into() }
    }

    /// Derive the TCN this link produces at chain position `index`.
    pub fn tcn(&self, index: u16) -> TemporaryContactNumber {
        TemporaryContactNumber::derive(index, self)
    }
}

impl Drop for TemporaryContactKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for TemporaryContactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryContactKey").finish_non_exhaustive()
    }
}

/// Recompute the TCNs for positions `start..=end` from a disclosed link.
///
/// `start_tck` is taken to sit at position `start`. Returns `(index, tcn)`
/// pairs in order; empty when `end < start`.
pub fn recompute_tcns(
    rvk: &ReportVerificationKey,
    start_tck: &TemporaryContactKey,
    start: u16,
    end: u16,
) -> Vec<(u16, TemporaryContactNumber)> {
    if end < start {
        return Vec::new();
    }

    let mut tcns = Vec::with_capacity(usize::from(end - start) + 1);
    let mut tck = start_tck.clone();

    for index in start..=end {
        tcns.push((index, tck.tcn(index)));
        if index < end {
            tck = tck.ratchet(rvk);
        }
    }

    debug_assert_eq!(tcns.len(), usize::from(end - start) + 1);
    tcns
}
