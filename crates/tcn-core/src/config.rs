//! Engine configuration.

use tcn_proto::Memo;

/// Payload of the default memo
pub const DEFAULT_MEMO_PAYLOAD: &[u8] = b"symptom data";

/// Configuration for a [`crate::RatchetEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Memo attached by `generate_report`. `generate_report_with_memo`
    /// overrides it per call.
    pub memo: Memo,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let Ok(memo) = Memo::symptom_report(DEFAULT_MEMO_PAYLOAD) else {
            unreachable!("default memo payload is shorter than 256 bytes");
        };
        Self { memo }
    }
}
