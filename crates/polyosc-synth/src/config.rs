//! Engine configuration fixed before rendering starts.

use crate::error::EngineError;

/// Counts, sample rate and block size for an [`Engine`](crate::Engine).
///
/// With the `serde` feature this deserializes from a TOML `[engine]` table;
/// missing fields take the defaults below.
///
/// | Field                  | Default |
/// |------------------------|---------|
/// | `voice_count`          | 8       |
/// | `oscillators_per_voice`| 3       |
/// | `sample_rate`          | 48000.0 |
/// | `max_block_size`       | 512     |
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Number of voices (maximum polyphony).
    pub voice_count: usize,
    /// Oscillators owned by each voice.
    pub oscillators_per_voice: usize,
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block the pool renders in one pass; longer host blocks are
    /// rendered in chunks of this size.
    pub max_block_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            voice_count: 8,
            oscillators_per_voice: 3,
            sample_rate: 48000.0,
            max_block_size: 512,
        }
    }
}

impl EngineConfig {
    /// Default configuration with the given counts.
    pub fn with_counts(voice_count: usize, oscillators_per_voice: usize) -> Self {
        Self {
            voice_count,
            oscillators_per_voice,
            ..Self::default()
        }
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.voice_count == 0 {
            return Err(EngineError::NoVoices);
        }
        if self.oscillators_per_voice == 0 {
            return Err(EngineError::NoOscillators);
        }
        validate_sample_rate(self.sample_rate)?;
        if self.max_block_size == 0 {
            return Err(EngineError::ZeroBlockSize);
        }
        Ok(())
    }
}

pub(crate) fn validate_sample_rate(sample_rate: f32) -> Result<(), EngineError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidSampleRate(sample_rate))
    }
}
