//! TCN ratchet engine.
//!
//! Stateful protocol logic on top of [`tcn_crypto`] primitives and the
//! [`tcn_proto`] wire format. No I/O: the engine hands back TCNs and report
//! bytes; broadcasting and uploading them is the caller's job.
//!
//! # Components
//!
//! - [`RatchetEngine`]: owns the RAK and the append-only TCK chain; issues
//!   TCNs and signs disclosure reports
//! - [`SharedRatchet`]: cloneable handle serializing all engine access
//!   behind one lock
//! - [`ReportVerifier`]: checks a report and recomputes the TCNs in its
//!   window
//! - [`EngineConfig`]: report defaults
//!
//! # Lifecycle
//!
//! ```text
//! RatchetEngine::generate(rng)        RAK, RVK, chain = [TCK₀]
//!        │
//!        ▼
//! new_tcn() ×N                        chain = [TCK₀ … TCK_N], TCN₁ … TCN_N
//!        │
//!        ▼
//! generate_report(days_before)        signed [RVK, TCK_s, s+1, N+1, memo]
//!        │
//!        ▼
//! ReportVerifier::verify(bytes)       TCN_s … TCN_N recomputed
//! ```
//!
//! The engine keeps every link in memory. The chain is bounded by the 16-bit
//! period field at [`MAX_INDEX`] + 1 links (about 2 MiB), after which
//! `new_tcn()` fails with [`EngineError::RatchetExhausted`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod shared;
pub mod verifier;

pub use config::EngineConfig;
pub use engine::{MAX_INDEX, RatchetEngine};
pub use error::{EngineError, VerifyError};
pub use shared::SharedRatchet;
pub use tcn_crypto::{ReportVerificationKey, TemporaryContactNumber};
pub use tcn_proto::{Memo, MemoType};
pub use verifier::{ReportVerifier, VerifiedReport};
