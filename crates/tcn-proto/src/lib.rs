//! TCN wire format.
//!
//! Byte layouts for disclosure reports and their memos. Pure data holders
//! with strict encode/decode; signing and verification are done by callers
//! (`tcn-core`) using `tcn-crypto`.
//!
//! # Components
//!
//! - [`Memo`]: `[type][len][payload]`, at most 255 payload bytes
//! - [`ReportBody`]: the signed portion (RVK, TCK, period window, memo)
//! - [`Report`]: body plus trailing 64-byte Ed25519 signature

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod memo;
pub mod report;

pub use errors::{ProtocolError, Result};
pub use memo::{Memo, MemoType};
pub use report::{RVK_SIZE, Report, ReportBody, SIGNATURE_SIZE, TCK_SIZE};
