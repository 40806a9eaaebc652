//! Fuzz target for engine operation sequences
//!
//! Drives a `RatchetEngine` with an arbitrary interleaving of TCN issuance and
//! report generation.
//!
//! # Invariants
//!
//! - Chain grows by exactly one per successful `new_tcn()` and not at all
//!   once exhausted
//! - Reports fail with `DisclosureNotReady` only before the first TCN
//! - Every generated report verifies and never starts at index 0
//! - Recomputed TCNs equal the ones the engine issued for the window

#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use tcn_core::{
    EngineConfig, EngineError, Memo, RatchetEngine, ReportVerifier, TemporaryContactNumber,
};

#[derive(Debug, Clone, Arbitrary)]
struct RatchetScenario {
    /// RAK seed
    seed: [u8; 32],
    /// Operations to apply in order
    operations: Vec<Operation>,
}

#[derive(Debug, Clone, Arbitrary)]
enum Operation {
    /// Issue one TCN
    NewTcn,
    /// Issue a burst of TCNs
    Burst { count: u8 },
    /// Report with the default memo
    Report { days_before: u32 },
    /// Report with a caller memo
    ReportWithMemo { days_before: u32, payload: Vec<u8> },
}

fuzz_target!(|scenario: RatchetScenario| {
    let mut engine = RatchetEngine::from_seed(&scenario.seed, EngineConfig::default());
    let mut issued = Vec::new();

    for op in scenario.operations {
        match op {
            Operation::NewTcn => {
                if !issue(&mut engine, &mut issued) {
                    return;
                }
            },
            Operation::Burst { count } => {
                for _ in 0..count {
                    if !issue(&mut engine, &mut issued) {
                        return;
                    }
                }
            },
            Operation::Report { days_before } => {
                check_report(engine.generate_report(days_before), &issued);
            },
            Operation::ReportWithMemo { days_before, payload } => {
                let Ok(memo) = Memo::symptom_report(payload) else {
                    continue;
                };
                check_report(engine.generate_report_with_memo(days_before, memo), &issued);
            },
        }
    }
});

/// Issue one TCN, returning false once the ratchet is exhausted.
fn issue(engine: &mut RatchetEngine, issued: &mut Vec<TemporaryContactNumber>) -> bool {
    let before = engine.chain_len();
    match engine.new_tcn() {
        Ok(tcn) => {
            assert_eq!(engine.chain_len(), before + 1);
            issued.push(tcn);
            true
        },
        Err(EngineError::RatchetExhausted { max_index }) => {
            assert_eq!(issued.len(), usize::from(max_index));
            assert_eq!(engine.chain_len(), before, "exhausted ratchet must not grow");
            false
        },
        Err(other) => panic!("unexpected engine error: {other}"),
    }
}

fn check_report(result: Result<Bytes, EngineError>, issued: &[TemporaryContactNumber]) {
    match result {
        Ok(bytes) => {
            assert!(!issued.is_empty(), "report produced before any TCN");
            let verified = ReportVerifier::verify(&bytes).expect("engine reports always verify");
            assert!(verified.start_index() >= 1, "TCK0 disclosed");
            for (index, tcn) in verified.tcns() {
                assert_eq!(tcn, issued[usize::from(index) - 1]);
            }
        },
        Err(EngineError::DisclosureNotReady) => assert!(issued.is_empty()),
        Err(other) => panic!("unexpected engine error: {other}"),
    }
}
