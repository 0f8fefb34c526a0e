//! Voice allocation, stealing and mixing.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::config::{EngineConfig, validate_sample_rate};
use crate::error::EngineError;
use crate::event::{NoteEvent, NoteEventKind};
use crate::snapshot::ParamSnapshot;
use crate::voice::Voice;

/// Fixed-size pool of [`Voice`]s.
///
/// # Allocation Policy
///
/// A note-on picks, in order:
///
/// 1. the voice already holding the same pitch (retrigger),
/// 2. the lowest-indexed idle voice,
/// 3. the releasing voice whose release began earliest,
/// 4. the held voice triggered earliest.
///
/// Only voices whose [`Voice::can_play`] accepts the note are candidates. If
/// none qualifies, voice 0 is used, so a note-on is never dropped. Steps 3
/// and 4 count as steals (see [`steal_count`](Self::steal_count)).
///
/// # Real-Time Safety
///
/// Voices and the scratch buffer are allocated in [`new`](Self::new). Note
/// handling and [`render_block`](Self::render_block) never allocate.
///
/// # Example
///
/// ```rust
/// use polyosc_synth::{EngineConfig, NoteEvent, VoicePool};
///
/// let mut pool = VoicePool::new(&EngineConfig::with_counts(4, 2)).unwrap();
/// let voice = pool.note_on(60, 1.0);
/// assert_eq!(voice, 0);
///
/// let mut block = [0.0_f32; 256];
/// pool.render_block(&mut block, &[NoteEvent::note_off(60, 128)]);
/// assert_eq!(pool.active_voice_count(), 1); // still releasing
/// ```
#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: Vec<Voice>,
    scratch: Vec<f32>,
    sample_rate: f32,
    oscillators_per_voice: usize,
    /// Monotonic stamp shared by note-ons and note-offs
    order: u64,
    steal_count: u64,
}

impl VoicePool {
    /// Allocate `config.voice_count` voices of `config.oscillators_per_voice`
    /// oscillators each, plus a `config.max_block_size` scratch buffer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration is invalid.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let mut scratch = Vec::new();
        scratch.resize(config.max_block_size, 0.0);
        Ok(Self {
            voices: (0..config.voice_count)
                .map(|_| Voice::new(config.oscillators_per_voice, config.sample_rate))
                .collect(),
            scratch,
            sample_rate: config.sample_rate,
            oscillators_per_voice: config.oscillators_per_voice,
            order: 0,
            steal_count: 0,
        })
    }

    /// Change sample rate and scratch size. Not real-time safe.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] for a non-positive sample rate or zero block size.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) -> Result<(), EngineError> {
        validate_sample_rate(sample_rate)?;
        if max_block_size == 0 {
            return Err(EngineError::ZeroBlockSize);
        }
        self.sample_rate = sample_rate;
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
        self.scratch.resize(max_block_size, 0.0);
        Ok(())
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Number of voices.
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Oscillators per voice.
    pub fn oscillators_per_voice(&self) -> usize {
        self.oscillators_per_voice
    }

    /// Scratch size: the largest chunk rendered in one pass.
    pub fn max_block_size(&self) -> usize {
        self.scratch.len()
    }

    /// Number of voices that are not idle.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_idle()).count()
    }

    /// How many note-ons took over a sounding voice since the last reset.
    pub fn steal_count(&self) -> u64 {
        self.steal_count
    }

    /// Read access to all voices.
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Voice at `index`.
    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }

    /// Mutable access to all voices.
    pub fn voices_mut(&mut self) -> &mut [Voice] {
        &mut self.voices
    }

    /// Push one block's parameter values into every voice.
    pub fn apply_snapshot(&mut self, snapshot: &ParamSnapshot) {
        for voice in &mut self.voices {
            voice.apply_settings(snapshot.oscillators(), snapshot.envelopes());
        }
    }

    /// Start `note` and return the index of the voice playing it.
    ///
    /// Pitches above 127 are clamped to 127.
    pub fn note_on(&mut self, note: u8, velocity: f32) -> usize {
        let note = note.min(127);
        let index = self.allocate_voice(note);
        self.order += 1;
        self.voices[index].trigger_attack(note, velocity, self.order);
        index
    }

    /// Release every held voice playing `note`. No-op if none.
    pub fn note_off(&mut self, note: u8) {
        let note = note.min(127);
        let mut released = false;
        for voice in &mut self.voices {
            if voice.is_held() && voice.note() == Some(note) {
                if !released {
                    self.order += 1;
                    released = true;
                }
                voice.trigger_release(self.order);
            }
        }
    }

    /// Release every held voice.
    pub fn all_notes_off(&mut self) {
        self.order += 1;
        let order = self.order;
        for voice in &mut self.voices {
            voice.trigger_release(order);
        }
    }

    /// Silence every voice immediately and clear the counters.
    ///
    /// Call between blocks only.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.kill();
        }
        self.order = 0;
        self.steal_count = 0;
    }

    /// Render the mix of all voices into `output`, overwriting it.
    ///
    /// Each event is applied at its frame offset: the block is rendered in
    /// segments between event offsets. Events at or past `output.len()` are
    /// applied after the last frame. A zero-length `output` returns
    /// immediately without applying any event.
    pub fn render_block(&mut self, output: &mut [f32], events: &[NoteEvent]) {
        if output.is_empty() {
            return;
        }
        output.fill(0.0);

        let len = output.len();
        let mut position = 0;
        for event in events {
            // Out-of-order offsets are clamped to the current position
            let at = event.offset.clamp(position, len);
            if at > position {
                self.render_segment(&mut output[position..at]);
                position = at;
            }
            self.apply_event(event);
        }
        if position < len {
            self.render_segment(&mut output[position..]);
        }
    }

    fn apply_event(&mut self, event: &NoteEvent) {
        match event.kind {
            NoteEventKind::On => {
                self.note_on(event.note, event.velocity);
            }
            NoteEventKind::Off => self.note_off(event.note),
        }
    }

    /// Sum every non-idle voice into `output`, chunked by the scratch size.
    fn render_segment(&mut self, output: &mut [f32]) {
        let chunk_size = self.scratch.len();
        for chunk in output.chunks_mut(chunk_size) {
            let scratch = &mut self.scratch[..chunk.len()];
            for voice in &mut self.voices {
                if voice.is_idle() {
                    continue;
                }
                voice.render_block(scratch);
                for (out, &s) in chunk.iter_mut().zip(scratch.iter()) {
                    *out += s;
                }
            }
        }
    }

    fn allocate_voice(&mut self, note: u8) -> usize {
        // Retrigger the voice already holding this pitch
        if let Some(i) = self
            .voices
            .iter()
            .position(|v| v.is_held() && v.note() == Some(note) && v.can_play(note))
        {
            return i;
        }

        if let Some(i) = self
            .voices
            .iter()
            .position(|v| v.is_idle() && v.can_play(note))
        {
            return i;
        }

        let oldest_release = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.can_play(note))
            .filter_map(|(i, v)| v.release_order().map(|order| (i, order)))
            .min_by_key(|&(_, order)| order)
            .map(|(i, _)| i);

        let stolen = oldest_release.or_else(|| {
            self.voices
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_held() && v.can_play(note))
                .min_by_key(|(_, v)| v.trigger_order())
                .map(|(i, _)| i)
        });

        match stolen {
            Some(i) => {
                self.steal_count += 1;
                #[cfg(feature = "tracing")]
                tracing::trace!(voice = i, note, "voice stolen");
                i
            }
            None => 0,
        }
    }
}
