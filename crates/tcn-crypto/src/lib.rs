//! TCN Cryptographic Primitives
//!
//! Building blocks for the Temporary Contact Number ratchet. Pure functions
//! with deterministic outputs. Callers own all state (the chain lives in
//! `tcn-core`) and provide the seed, which keeps every derivation testable
//! against fixed vectors.
//!
//! # Key Hierarchy
//!
//! A single Ed25519 seed (the report authentication key, RAK) roots both the
//! signing identity and the hash chain. Only the first chain link touches the
//! seed; every later link is derived from the public verification key and its
//! predecessor, so a disclosed link can be ratcheted forward by anyone but
//! never backwards.
//!
//! ```text
//! RAK (32-byte seed, secret)
//!   │
//!   ├──► Ed25519 keygen ──► RVK (public)
//!   │
//!   ▼
//! TCK₀ = H("H_TCK" ‖ RAK)
//!   │
//!   ▼
//! TCKⱼ = H("H_TCK" ‖ RVK ‖ TCKⱼ₋₁)          j ≥ 1
//!   │
//!   ▼
//! TCNⱼ = H("H_TCN" ‖ LE16(j) ‖ TCKⱼ)[..16]
//! ```
//!
//! # Security
//!
//! One-wayness:
//! - `TCKⱼ₋₁` cannot be recovered from `TCKⱼ` (SHA-256 preimage resistance)
//! - `TCK₀` is the only link derived from RAK and is never disclosed
//!
//! Unlinkability:
//! - Each TCN is a truncated hash bound to its index; without some
//!   `TCKᵢ, i ≤ j` two TCNs cannot be linked to each other
//!
//! Authenticity:
//! - Reports are signed with RAK and verified against the embedded RVK
//! - Verification uses strict Ed25519 rules (no malleable signatures)
//!
//! Key hygiene:
//! - RAK and every TCK are zeroized on drop; the engine sizes its chain
//!   buffer once, so no stale copy of a link is left in freed memory
//! - `Debug` output never contains secret bytes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod ratchet;

pub use ratchet::{
    CryptoError, KEY_SIZE, ReportAuthenticationKey, ReportVerificationKey, SIGNATURE_SIZE,
    TCK_SIZE, TCN_SIZE, TemporaryContactKey, TemporaryContactNumber, recompute_tcns,
};
