//! Fuzz target for report decoding and verification
//!
//! Feeds arbitrary bytes to `Report::decode` and `ReportVerifier::verify`.
//!
//! # Invariants
//!
//! - Neither call ever panics
//! - A report that decodes re-encodes to exactly the input bytes
//! - A report that verifies has a non-empty window starting at period >= 1
//! - A report that verifies carries a well-formed RVK equal to its first 32
//!   bytes

#![no_main]

use libfuzzer_sys::fuzz_target;
use tcn_core::ReportVerifier;
use tcn_crypto::{KEY_SIZE, ReportVerificationKey};
use tcn_proto::Report;

fuzz_target!(|data: &[u8]| {
    if let Ok(report) = Report::decode(data) {
        // INVARIANT: decoding is strict, so encoding is its exact inverse
        assert_eq!(&report.to_bytes()[..], data, "decode/encode must be lossless");
    }

    if let Ok(verified) = ReportVerifier::verify(data) {
        // INVARIANT: verified windows are well-formed
        assert!(verified.start_index() <= verified.end_index());
        let window = usize::from(verified.end_index() - verified.start_index()) + 1;
        assert_eq!(verified.tcns().len(), window);

        // INVARIANT: the key that checked the signature is the embedded RVK
        let Ok(rvk_bytes) = <[u8; KEY_SIZE]>::try_from(&data[..KEY_SIZE]) else {
            unreachable!("verified reports are at least MIN_SIZE bytes");
        };
        let rvk = ReportVerificationKey::from_bytes(&rvk_bytes);
        assert_eq!(rvk, Ok(verified.verification_key()));
    }
});
