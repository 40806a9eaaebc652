//! Property-based tests for the ratchet engine
//!
//! These tests verify the engine's contract with verifiers for arbitrary
//! seeds, call counts and window sizes:
//!
//! 1. **Round-trip**: every report verifies and recomputes exactly the TCNs
//!    the engine issued for its window
//! 2. **Clamp**: the window never reaches index 0
//! 3. **Determinism**: same seed, same calls, same bytes
//! 4. **Tamper evidence**: any flipped byte is rejected

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tcn_core::{EngineConfig, RatchetEngine, ReportVerifier, TemporaryContactNumber};

fn engine_with_tcns(rng_seed: u64, count: usize) -> (RatchetEngine, Vec<TemporaryContactNumber>) {
    let mut rng = ChaCha20Rng::seed_from_u64(rng_seed);
    let mut engine =
        RatchetEngine::generate(&mut rng, EngineConfig::default()).expect("seeded RNG never fails");
    let tcns = (0..count).map(|_| engine.new_tcn().expect("below exhaustion")).collect();
    (engine, tcns)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_report_recomputes_issued_window(
        rng_seed in any::<u64>(),
        count in 1usize..40,
        days_before in 0u32..60,
    ) {
        let (engine, tcns) = engine_with_tcns(rng_seed, count);
        let bytes = engine.generate_report(days_before).unwrap();
        let verified = ReportVerifier::verify(&bytes).unwrap();

        let end = count as u16;
        let expected_start = end.saturating_sub(days_before as u16).max(1);

        prop_assert_eq!(verified.end_index(), end);
        prop_assert_eq!(verified.start_index(), expected_start);
        prop_assert_eq!(verified.verification_key(), engine.verification_key());

        for (index, tcn) in verified.tcns() {
            prop_assert_eq!(tcn, tcns[usize::from(index) - 1], "index {}", index);
        }
    }

    #[test]
    fn prop_window_never_discloses_tck0(
        rng_seed in any::<u64>(),
        count in 1usize..20,
        extra in 0u32..1000,
    ) {
        let (engine, _) = engine_with_tcns(rng_seed, count);

        // days_before >= end - 1 must always start at index 1
        let days_before = count as u32 - 1 + extra;
        let report = engine.generate_report(days_before).unwrap();
        let verified = ReportVerifier::verify(&report).unwrap();

        prop_assert_eq!(verified.start_index(), 1);
    }

    #[test]
    fn prop_engine_is_deterministic(rng_seed in any::<u64>(), count in 1usize..20) {
        let (a, tcns_a) = engine_with_tcns(rng_seed, count);
        let (b, tcns_b) = engine_with_tcns(rng_seed, count);

        prop_assert_eq!(tcns_a, tcns_b);
        prop_assert_eq!(a.generate_report(5).unwrap(), b.generate_report(5).unwrap());
    }

    #[test]
    fn prop_any_flipped_byte_is_rejected(
        rng_seed in any::<u64>(),
        position in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let (engine, _) = engine_with_tcns(rng_seed, 5);
        let mut bytes = engine.generate_report(3).unwrap().to_vec();

        let at = position.index(bytes.len());
        bytes[at] ^= mask;

        prop_assert!(ReportVerifier::verify(&bytes).is_err(), "flip at byte {} accepted", at);
    }
}
