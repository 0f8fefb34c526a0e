//! Error types for engine construction and reconfiguration.

use thiserror::Error;

/// Engine misconfiguration, reported before any rendering happens.
///
/// The render path itself never fails.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EngineError {
    /// Voice count must be at least one.
    #[error("voice count must be at least 1")]
    NoVoices,

    /// Oscillators per voice must be at least one.
    #[error("oscillators per voice must be at least 1")]
    NoOscillators,

    /// Sample rate must be finite and positive.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f32),

    /// Maximum block size must be at least one frame.
    #[error("maximum block size must be at least 1 frame")]
    ZeroBlockSize,
}
