//! Host-facing engine: owns the voice pool and the parameter applier.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::event::NoteEvent;
use crate::pool::VoicePool;
use crate::snapshot::{ParamSource, SnapshotApplier};

/// Polyphonic multi-oscillator synthesizer engine.
///
/// Each call to [`process`](Self::process) captures the current parameters,
/// applies the block's note events at their frame offsets, and writes the
/// mono voice mix to every output channel.
///
/// # Example
///
/// ```rust
/// use polyosc_synth::{Engine, EngineConfig, NoteEvent, ParamSnapshot};
///
/// let config = EngineConfig::with_counts(8, 3);
/// let mut engine = Engine::new(config).unwrap();
/// let patch = ParamSnapshot::new(3);
///
/// let mut left = vec![0.0_f32; 256];
/// let mut right = vec![0.0_f32; 256];
/// let events = [NoteEvent::note_on(60, 0.9, 0), NoteEvent::note_on(64, 0.9, 64)];
///
/// engine.process(&patch, &mut [&mut left[..], &mut right[..]], &events);
/// assert_eq!(left, right);
/// assert_eq!(engine.active_voice_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    pool: VoicePool,
    applier: SnapshotApplier,
}

impl Engine {
    /// Build an engine with the voice and oscillator counts in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let pool = VoicePool::new(&config)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            voices = config.voice_count,
            oscillators = config.oscillators_per_voice,
            sample_rate = config.sample_rate,
            max_block_size = config.max_block_size,
            "engine created"
        );
        Ok(Self {
            applier: SnapshotApplier::new(config.oscillators_per_voice),
            config,
            pool,
        })
    }

    /// Change sample rate and maximum block size between blocks.
    ///
    /// Sounding voices keep playing at the new rate. Not real-time safe:
    /// the scratch buffer may be reallocated.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] for an invalid sample rate or zero block size;
    /// the engine is left unchanged.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) -> Result<(), EngineError> {
        self.pool.prepare(sample_rate, max_block_size)?;
        self.config.sample_rate = sample_rate;
        self.config.max_block_size = max_block_size;
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, max_block_size, "engine prepared");
        Ok(())
    }

    /// Render one block into every channel.
    ///
    /// All channels should hold the same number of frames; the shortest
    /// length is rendered and any extra frames in longer channels are
    /// zeroed. Channel contents are overwritten.
    pub fn process<S: ParamSource + ?Sized>(
        &mut self,
        source: &S,
        channels: &mut [&mut [f32]],
        events: &[NoteEvent],
    ) {
        let Some(frames) = channels.iter().map(|ch| ch.len()).min() else {
            return;
        };
        if frames == 0 {
            return;
        }

        let Some((first, rest)) = channels.split_first_mut() else {
            return;
        };
        self.process_mono(source, &mut first[..frames], events);
        first[frames..].fill(0.0);
        for channel in rest {
            channel[..frames].copy_from_slice(&first[..frames]);
            channel[frames..].fill(0.0);
        }
    }

    /// Render one block into a single buffer.
    pub fn process_mono<S: ParamSource + ?Sized>(
        &mut self,
        source: &S,
        output: &mut [f32],
        events: &[NoteEvent],
    ) {
        if output.is_empty() {
            return;
        }
        self.applier.apply(source, &mut self.pool);
        self.pool.render_block(output, events);
    }

    /// Start a note immediately (before the next block). Returns the voice index.
    pub fn note_on(&mut self, note: u8, velocity: f32) -> usize {
        self.pool.note_on(note.min(127), velocity)
    }

    /// Release a note immediately (before the next block).
    pub fn note_off(&mut self, note: u8) {
        self.pool.note_off(note);
    }

    /// Release every held note.
    pub fn all_notes_off(&mut self) {
        self.pool.all_notes_off();
    }

    /// Silence everything immediately. Call between blocks only.
    pub fn reset(&mut self) {
        self.pool.reset();
        #[cfg(feature = "tracing")]
        tracing::debug!("engine reset");
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of voices that are not idle.
    pub fn active_voice_count(&self) -> usize {
        self.pool.active_voice_count()
    }

    /// The voice pool.
    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    /// Mutable voice pool, for direct voice inspection in hosts and tests.
    pub fn pool_mut(&mut self) -> &mut VoicePool {
        &mut self.pool
    }

    /// Parameters captured for the most recent block.
    pub fn applier(&self) -> &SnapshotApplier {
        &self.applier
    }
}
