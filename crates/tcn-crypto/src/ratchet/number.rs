//! Temporary contact numbers (the broadcast identifiers).

use std::fmt;

use sha2::{Digest, Sha256};

use super::chain::TemporaryContactKey;

/// Domain separation label for TCN derivation
const TCN_LABEL: &[u8] = b"H_TCN";

/// Size of a TCN in bytes (truncated SHA-256)
pub const TCN_SIZE: usize = 16;

/// A 16-byte Temporary Contact Number.
///
/// Public by construction: this is what gets broadcast. Ordering and hashing
/// are over the raw bytes so TCNs can be kept in sets for matching.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemporaryContactNumber([u8; TCN_SIZE]);

impl TemporaryContactNumber {
    /// Derive `TCNⱼ = H("H_TCN" ‖ LE16(j) ‖ TCKⱼ)[..16]`.
    pub fn derive(index: u16, tck: &TemporaryContactKey) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(TCN_LABEL);
        hasher.update(index.to_le_bytes());
        hasher.update(tck.as_bytes());
        let digest = hasher.finalize();

        let mut tcn = [0u8; TCN_SIZE];
        tcn.copy_from_slice(&digest[..TCN_SIZE]);
        Self(tcn)
    }

    /// Wrap an observed TCN.
    pub fn from_bytes(bytes: [u8; TCN_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw TCN bytes.
    pub fn as_bytes(&self) -> &[u8; TCN_SIZE] {
        &self.0
    }
}

impl fmt::Debug for TemporaryContactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TemporaryContactNumber({})", hex::encode(self.0))
    }
}

impl fmt::Display for TemporaryContactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
