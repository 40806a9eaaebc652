#![allow(clippy::disallowed_types, reason = "Synchronous CPU-bound critical sections only")]

//! Thread-safe handle to a ratchet engine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tcn_crypto::{ReportVerificationKey, TemporaryContactNumber};
use tcn_proto::Memo;

use crate::{engine::RatchetEngine, error::EngineError};

/// Cloneable, lock-guarded [`RatchetEngine`]
///
/// Every operation holds the one engine-wide lock for its whole duration, so
/// a report never sees a half-appended chain and two TCN requests never
/// ratchet from the same tail. Critical sections are a few hashes and at most
/// one signature; nothing blocks on I/O while the lock is held.
///
/// A poisoned lock is recovered rather than propagated: the chain only
/// changes by a single `Vec::push`, which either happened or did not.
#[derive(Clone)]
pub struct SharedRatchet {
    inner: Arc<Mutex<RatchetEngine>>,
}

impl SharedRatchet {
    /// Take ownership of `engine`.
    pub fn new(engine: RatchetEngine) -> Self {
        Self { inner: Arc::new(Mutex::new(engine)) }
    }

    /// See [`RatchetEngine::new_tcn`].
    pub fn new_tcn(&self) -> Result<TemporaryContactNumber, EngineError> {
        self.lock().new_tcn()
    }

    /// See [`RatchetEngine::generate_report`].
    pub fn generate_report(&self, days_before: u32) -> Result<Bytes, EngineError> {
        self.lock().generate_report(days_before)
    }

    /// See [`RatchetEngine::generate_report_with_memo`].
    pub fn generate_report_with_memo(
        &self,
        days_before: u32,
        memo: Memo,
    ) -> Result<Bytes, EngineError> {
        self.lock().generate_report_with_memo(days_before, memo)
    }

    /// Public verification key.
    pub fn verification_key(&self) -> ReportVerificationKey {
        self.lock().verification_key()
    }

    /// Number of links in the chain, `TCK₀` included.
    pub fn chain_len(&self) -> usize {
        self.lock().chain_len()
    }

    fn lock(&self) -> MutexGuard<'_, RatchetEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<RatchetEngine> for SharedRatchet {
    fn from(engine: RatchetEngine) -> Self {
        Self::new(engine)
    }
}
