//! Ratchet engine: owns the RAK and the TCK chain.
//!
//! # Invariants
//!
//! - The chain is never empty: index 0 holds `TCK₀` from construction on
//! - The chain is append-only; each successful `new_tcn()` adds exactly one
//!   link and nothing else ever changes it
//! - Chain length never exceeds `MAX_INDEX + 1`, so every index and every
//!   reported period (`index + 1`) fits in a `u16`
//! - `TCK₀` is never disclosed; reports start at index 1 or later
//! - The chain buffer is allocated at full size up front and never moves, so
//!   no un-zeroized copy of a TCK is left behind in freed memory

use bytes::Bytes;
use rand::{CryptoRng, RngCore};
use tcn_crypto::{
    KEY_SIZE, ReportAuthenticationKey, ReportVerificationKey, TemporaryContactKey,
    TemporaryContactNumber,
};
use tcn_proto::{Memo, Report, ReportBody};
use zeroize::Zeroize;

use crate::{config::EngineConfig, error::EngineError};

/// Largest chain index the engine will issue.
///
/// The end period written into a report is `index + 1` as a `u16`, so the
/// last usable index is one below `u16::MAX`.
pub const MAX_INDEX: u16 = u16::MAX - 1;

/// Links in a full chain, `TCK₀` through `TCK_MAX_INDEX`.
const CHAIN_CAPACITY: usize = MAX_INDEX as usize + 1;

/// TCN issuer and report signer.
///
/// Single-owner: mutation goes through `&mut self`. Wrap in
/// [`crate::SharedRatchet`] to share across threads.
pub struct RatchetEngine {
    /// Report authentication key (secret seed)
    rak: ReportAuthenticationKey,
    /// Report verification key (public)
    rvk: ReportVerificationKey,
    /// Hash chain, `chain[i]` is `TCKᵢ`
    chain: Vec<TemporaryContactKey>,
    /// Report defaults
    config: EngineConfig,
}

impl RatchetEngine {
    /// Create an engine with a fresh RAK drawn from `rng`.
    ///
    /// The RNG is used only here; nothing else in the engine is random.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the RNG fails to produce entropy
    pub fn generate<R>(rng: &mut R, config: EngineConfig) -> Result<Self, EngineError>
    where
        R: RngCore + CryptoRng,
    {
        let mut seed = [0u8; KEY_SIZE];
        if let Err(e) = rng.try_fill_bytes(&mut seed) {
            tracing::error!(error = %e, "RNG failed while generating RAK");
            return Err(EngineError::Configuration { reason: e.to_string() });
        }

        let engine = Self::from_seed(&seed, config);
        seed.zeroize();
        Ok(engine)
    }

    /// Create an engine from a known RAK seed.
    ///
    /// Deterministic: the same seed always yields the same RVK, chain and
    /// reports.
    pub fn from_seed(seed: &[u8; KEY_SIZE], config: EngineConfig) -> Self {
        let rak = ReportAuthenticationKey::from_bytes(seed);
        let rvk = rak.verification_key();
        let tck0 = TemporaryContactKey::initial(&rak);

        let mut chain = Vec::with_capacity(CHAIN_CAPACITY);
        chain.push(tck0);

        tracing::info!(rvk = %rvk, "ratchet engine initialized");

        Self { rak, rvk, chain, config }
    }

    /// Public verification key.
    pub fn verification_key(&self) -> ReportVerificationKey {
        self.rvk
    }

    /// Number of links in the chain, `TCK₀` included.
    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    /// Index of the most recent link (0 until the first `new_tcn()`).
    pub fn latest_index(&self) -> u16 {
        debug_assert!(self.chain.len() <= usize::from(MAX_INDEX) + 1);
        (self.chain.len() - 1) as u16
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Advance the ratchet one step and return the new TCN.
    ///
    /// The returned TCN belongs to chain index `j = chain_len() - 1` after the
    /// call.
    ///
    /// # Errors
    ///
    /// - `RatchetExhausted` once index [`MAX_INDEX`] has been issued. The
    ///   chain is left unchanged.
    pub fn new_tcn(&mut self) -> Result<TemporaryContactNumber, EngineError> {
        let index = match u16::try_from(self.chain.len()) {
            Ok(index) if index <= MAX_INDEX => index,
            _ => {
                tracing::warn!(max_index = MAX_INDEX, "ratchet exhausted, refusing to advance");
                return Err(EngineError::RatchetExhausted { max_index: MAX_INDEX });
            },
        };

        let next = self.tail().ratchet(&self.rvk);
        let tcn = next.tcn(index);
        debug_assert!(self.chain.len() < self.chain.capacity(), "chain must not reallocate");
        self.chain.push(next);

        debug_assert_eq!(self.latest_index(), index);
        tracing::debug!(index, "ratchet advanced");

        Ok(tcn)
    }

    /// Build a signed report with the configured default memo.
    ///
    /// See [`Self::generate_report_with_memo`].
    pub fn generate_report(&self, days_before: u32) -> Result<Bytes, EngineError> {
        self.generate_report_with_memo(days_before, self.config.memo.clone())
    }

    /// Build a signed report disclosing the last `days_before + 1` links.
    ///
    /// The window is `start..=end` with `end` the latest index and
    /// `start = max(1, end - days_before)`. Periods on the wire are
    /// `index + 1`. Does not modify the engine.
    ///
    /// # Errors
    ///
    /// - `DisclosureNotReady` if no TCN has been issued yet
    pub fn generate_report_with_memo(
        &self,
        days_before: u32,
        memo: Memo,
    ) -> Result<Bytes, EngineError> {
        let end = self.latest_index();
        if end == 0 {
            tracing::warn!("report requested before any TCN was issued");
            return Err(EngineError::DisclosureNotReady);
        }

        // Never reach back to TCK₀: it is derived straight from the RAK
        let window = u16::try_from(days_before).unwrap_or(u16::MAX);
        let start = end.saturating_sub(window).max(1);
        debug_assert!((1..=end).contains(&start));

        let memo_type = memo.memo_type();
        let body = ReportBody {
            rvk: self.rvk.to_bytes(),
            tck: *self.chain[usize::from(start)].as_bytes(),
            start_period: start + 1,
            end_period: end + 1,
            memo,
        };
        let signature = self.rak.sign(&body.to_bytes());
        let report = Report { body, signature };

        tracing::info!(start, end, memo_type = ?memo_type, "disclosure report generated");

        Ok(report.to_bytes())
    }

    /// Most recent link.
    fn tail(&self) -> &TemporaryContactKey {
        let Some(tail) = self.chain.last() else {
            unreachable!("chain always holds TCK0");
        };
        tail
    }
}

impl std::fmt::Debug for RatchetEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatchetEngine")
            .field("rvk", &self.rvk)
            .field("chain_len", &self.chain.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use tcn_crypto::{SIGNATURE_SIZE, recompute_tcns};

    use super::*;

    const VECTOR_RAK: &str = "577cfdae21fee71579211ab02c418ee0948bacab613cf69d0a4a5ae5a1557dbb";

    fn vector_seed() -> [u8; KEY_SIZE] {
        let mut seed = [0u8; KEY_SIZE];
        hex::decode_to_slice(VECTOR_RAK, &mut seed).unwrap();
        seed
    }

    fn engine_with_tcns(count: usize) -> (RatchetEngine, Vec<TemporaryContactNumber>) {
        let mut engine = RatchetEngine::from_seed(&vector_seed(), EngineConfig::default());
        let tcns = (0..count).map(|_| engine.new_tcn().unwrap()).collect();
        (engine, tcns)
    }

    /// RNG that never produces entropy.
    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            unreachable!("engine only calls try_fill_bytes")
        }

        fn next_u64(&mut self) -> u64 {
            unreachable!("engine only calls try_fill_bytes")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unreachable!("engine only calls try_fill_bytes")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::other("no entropy")))
        }
    }

    impl CryptoRng for FailingRng {}

    #[test]
    fn rng_failure_is_configuration_error() {
        let err = RatchetEngine::generate(&mut FailingRng, EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::Configuration { .. }), "got {err:?}");
        assert!(!err.is_retryable());
    }

    #[test]
    fn chain_buffer_never_reallocates() {
        let mut engine = RatchetEngine::from_seed(&vector_seed(), EngineConfig::default());
        assert!(engine.chain.capacity() >= usize::from(MAX_INDEX) + 1);

        let buffer = engine.chain.as_ptr();
        for _ in 0..1000 {
            engine.new_tcn().unwrap();
        }
        assert_eq!(engine.chain.as_ptr(), buffer);
    }

    #[test]
    fn new_engine_holds_only_tck0() {
        let engine = RatchetEngine::from_seed(&vector_seed(), EngineConfig::default());
        assert_eq!(engine.chain_len(), 1);
        assert_eq!(engine.latest_index(), 0);
    }

    #[test]
    fn generated_engines_differ() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let a = RatchetEngine::generate(&mut rng, EngineConfig::default()).unwrap();
        let b = RatchetEngine::generate(&mut rng, EngineConfig::default()).unwrap();
        assert_ne!(a.verification_key(), b.verification_key());
    }

    #[test]
    fn generate_is_deterministic_for_seeded_rng() {
        let a = RatchetEngine::generate(&mut ChaCha20Rng::seed_from_u64(7), EngineConfig::default())
            .unwrap();
        let b = RatchetEngine::generate(&mut ChaCha20Rng::seed_from_u64(7), EngineConfig::default())
            .unwrap();
        assert_eq!(a.verification_key(), b.verification_key());
    }

    #[test]
    fn new_tcn_grows_chain_by_one() {
        let mut engine = RatchetEngine::from_seed(&vector_seed(), EngineConfig::default());

        for expected_index in 1..=5u16 {
            engine.new_tcn().unwrap();
            assert_eq!(engine.latest_index(), expected_index);
            assert_eq!(engine.chain_len(), usize::from(expected_index) + 1);
        }
    }

    #[test]
    fn tcn_sequence_is_deterministic() {
        let (_, first) = engine_with_tcns(9);
        let (_, second) = engine_with_tcns(9);
        assert_eq!(first, second);
    }

    #[test]
    fn tcn_matches_chain_position() {
        let (engine, tcns) = engine_with_tcns(4);
        for (offset, tcn) in tcns.iter().enumerate() {
            let index = offset + 1;
            assert_eq!(*tcn, engine.chain[index].tcn(index as u16));
        }
    }

    #[test]
    fn report_before_first_tcn_is_not_ready() {
        let engine = RatchetEngine::from_seed(&vector_seed(), EngineConfig::default());
        assert_eq!(engine.generate_report(0), Err(EngineError::DisclosureNotReady));
        assert_eq!(engine.generate_report(100), Err(EngineError::DisclosureNotReady));
    }

    #[test]
    fn report_ready_after_one_tcn() {
        let (engine, _) = engine_with_tcns(1);
        let report = Report::decode(&engine.generate_report(0).unwrap()).unwrap();

        assert_eq!(report.body.start_period, 2);
        assert_eq!(report.body.end_period, 2);
    }

    #[test]
    fn window_clamps_to_index_one() {
        let (engine, _) = engine_with_tcns(5);

        for days_before in [4, 5, 100, u32::MAX] {
            let report = Report::decode(&engine.generate_report(days_before).unwrap()).unwrap();
            assert_eq!(report.body.start_period, 2, "days_before = {days_before}");
            assert_eq!(report.body.end_period, 6);
            assert_eq!(&report.body.tck, engine.chain[1].as_bytes());
        }
    }

    #[test]
    fn window_covers_requested_days() {
        let (engine, _) = engine_with_tcns(9);
        let report = Report::decode(&engine.generate_report(3).unwrap()).unwrap();

        assert_eq!(report.body.start_period, 7);
        assert_eq!(report.body.end_period, 10);
        assert_eq!(&report.body.tck, engine.chain[6].as_bytes());
    }

    #[test]
    fn report_never_discloses_tck0() {
        let (engine, _) = engine_with_tcns(3);
        let report = Report::decode(&engine.generate_report(u32::MAX).unwrap()).unwrap();
        assert_ne!(&report.body.tck, engine.chain[0].as_bytes());
    }

    #[test]
    fn report_does_not_mutate_engine() {
        let (engine, _) = engine_with_tcns(4);
        let first = engine.generate_report(2).unwrap();
        let second = engine.generate_report(2).unwrap();

        assert_eq!(engine.chain_len(), 5);
        assert_eq!(first, second, "Ed25519 signing is deterministic");
    }

    #[test]
    fn report_signature_verifies_under_embedded_rvk() {
        let (engine, _) = engine_with_tcns(6);
        let bytes = engine.generate_report(3).unwrap();

        let (signed, signature) = bytes.split_at(bytes.len() - SIGNATURE_SIZE);
        let mut sig = [0u8; SIGNATURE_SIZE];
        sig.copy_from_slice(signature);

        let rvk_bytes: [u8; KEY_SIZE] = bytes[..KEY_SIZE].try_into().unwrap();
        let rvk = ReportVerificationKey::from_bytes(&rvk_bytes).unwrap();
        assert_eq!(rvk, engine.verification_key());
        assert!(rvk.verify(signed, &sig).is_ok());
    }

    #[test]
    fn report_window_recomputes_issued_tcns() {
        let (engine, tcns) = engine_with_tcns(9);
        let report = Report::decode(&engine.generate_report(4).unwrap()).unwrap();

        let start = report.body.start_period - 1;
        let end = report.body.end_period - 1;
        let disclosed = TemporaryContactKey::from_bytes(report.body.tck);
        let recomputed = recompute_tcns(&engine.verification_key(), &disclosed, start, end);

        assert_eq!(recomputed.len(), 5);
        for (index, tcn) in recomputed {
            assert_eq!(tcn, tcns[usize::from(index) - 1]);
        }
    }

    #[test]
    fn custom_memo_is_carried() {
        let (engine, _) = engine_with_tcns(2);
        let memo = Memo::symptom_report(&b"fever"[..]).unwrap();

        let bytes = engine.generate_report_with_memo(1, memo.clone()).unwrap();
        let report = Report::decode(&bytes).unwrap();
        assert_eq!(report.body.memo, memo);
    }

    #[test]
    fn configured_memo_used_by_default() {
        let memo = Memo::symptom_report(&b"cough"[..]).unwrap();
        let mut engine =
            RatchetEngine::from_seed(&vector_seed(), EngineConfig { memo: memo.clone() });
        assert_eq!(engine.config().memo, memo);
        engine.new_tcn().unwrap();

        let report = Report::decode(&engine.generate_report(0).unwrap()).unwrap();
        assert_eq!(report.body.memo, memo);
    }

    #[test]
    fn ratchet_exhausts_at_max_index() {
        let mut engine = RatchetEngine::from_seed(&vector_seed(), EngineConfig::default());
        for _ in 0..MAX_INDEX {
            engine.new_tcn().unwrap();
        }
        assert_eq!(engine.latest_index(), MAX_INDEX);

        let result = engine.new_tcn();
        assert_eq!(result, Err(EngineError::RatchetExhausted { max_index: MAX_INDEX }));
        assert_eq!(engine.chain_len(), usize::from(MAX_INDEX) + 1);

        // Reports still work at the edge; end period is u16::MAX
        let report = Report::decode(&engine.generate_report(0).unwrap()).unwrap();
        assert_eq!(report.body.end_period, u16::MAX);
    }

    #[test]
    fn debug_does_not_leak_chain() {
        let (engine, _) = engine_with_tcns(1);
        let rendered = format!("{engine:?}");
        assert!(rendered.contains("chain_len: 2"));
        assert!(!rendered.contains(&hex::encode(engine.chain[1].as_bytes())));
    }
}
