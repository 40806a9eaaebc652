//! Report verification and TCN matching
//!
//! The verifier side of the protocol. Given report bytes from an untrusted
//! source it checks structure, window and signature, then ratchets forward
//! from the disclosed link to recompute the TCNs in the window. Nothing before
//! the disclosed link can be derived.

use std::collections::HashSet;

use tcn_crypto::{
    ReportVerificationKey, TemporaryContactKey, TemporaryContactNumber, recompute_tcns,
};
use tcn_proto::{Memo, Report};

use crate::error::VerifyError;

/// Stateless report verifier
pub struct ReportVerifier;

impl ReportVerifier {
    /// Verify a report and return its disclosed window.
    ///
    /// Checks, in order:
    /// 1. Byte layout (size bounds, memo length)
    /// 2. Period window (start period ≥ 1, end ≥ start)
    /// 3. RVK is a valid Ed25519 key
    /// 4. Signature over every byte before the trailing 64
    pub fn verify(bytes: &[u8]) -> Result<VerifiedReport, VerifyError> {
        let report = Report::decode(bytes).inspect_err(|e| {
            tracing::debug!(error = %e, len = bytes.len(), "rejecting malformed report");
        })?;
        let body = report.body;

        if body.start_period == 0 || body.end_period < body.start_period {
            tracing::debug!(
                start = body.start_period,
                end = body.end_period,
                "rejecting report with invalid window"
            );
            return Err(VerifyError::InvalidPeriods {
                start: body.start_period,
                end: body.end_period,
            });
        }

        let rvk = ReportVerificationKey::from_bytes(&body.rvk)?;

        let (signed, _) = Report::split_signature(bytes)?;
        rvk.verify(signed, &report.signature).inspect_err(|_| {
            tracing::debug!(rvk = %rvk, "rejecting report with bad signature");
        })?;

        Ok(VerifiedReport {
            rvk,
            start_tck: TemporaryContactKey::from_bytes(body.tck),
            start_index: body.start_period - 1,
            end_index: body.end_period - 1,
            memo: body.memo,
        })
    }
}

/// A report whose signature and window have been checked
///
/// Chain indices are 0-based (`period - 1`); `start_tck` sits at
/// `start_index`.
#[derive(Debug, Clone)]
pub struct VerifiedReport {
    rvk: ReportVerificationKey,
    start_tck: TemporaryContactKey,
    start_index: u16,
    end_index: u16,
    memo: Memo,
}

impl VerifiedReport {
    /// Reporter's verification key.
    pub fn verification_key(&self) -> ReportVerificationKey {
        self.rvk
    }

    /// First disclosed chain index.
    pub fn start_index(&self) -> u16 {
        self.start_index
    }

    /// Last disclosed chain index.
    pub fn end_index(&self) -> u16 {
        self.end_index
    }

    /// Attached memo.
    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    /// Recompute `(index, tcn)` for every index in the window.
    pub fn tcns(&self) -> Vec<(u16, TemporaryContactNumber)> {
        recompute_tcns(&self.rvk, &self.start_tck, self.start_index, self.end_index)
    }

    /// Observed TCNs that fall inside this report's window.
    ///
    /// Returned in the order they were observed; duplicates in `observed`
    /// are kept.
    pub fn matches<'a>(
        &self,
        observed: impl IntoIterator<Item = &'a TemporaryContactNumber>,
    ) -> Vec<TemporaryContactNumber> {
        let reported: HashSet<TemporaryContactNumber> =
            self.tcns().into_iter().map(|(_, tcn)| tcn).collect();

        observed.into_iter().filter(|tcn| reported.contains(tcn)).copied().collect()
    }
}
