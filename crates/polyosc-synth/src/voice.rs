//! A single synthesizer voice: a fixed bank of oscillators playing one note.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use polyosc_core::{flush_denormal, midi_to_freq};

use crate::envelope::AdsrSettings;
use crate::oscillator::{Oscillator, OscillatorSettings};

/// Lifecycle state of a [`Voice`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoiceState {
    /// No note assigned and every envelope finished.
    #[default]
    Idle,
    /// Note held (gate open).
    Playing,
    /// Note released, envelopes still sounding.
    Releasing,
}

/// One voice of the polyphonic engine.
///
/// Owns exactly `oscillator_count` [`Oscillator`]s, fixed at construction.
/// The voice output is the sum of its oscillators (each already shaped by
/// its own envelope and gain) scaled by the note velocity.
///
/// Trigger and release orders are stamped by the owning pool and drive voice
/// stealing.
///
/// # Example
///
/// ```rust
/// use polyosc_synth::{Voice, VoiceState};
///
/// let mut voice = Voice::new(3, 48000.0);
/// voice.trigger_attack(60, 1.0, 1);
/// assert_eq!(voice.state(), VoiceState::Playing);
///
/// let mut block = [0.0_f32; 64];
/// voice.render_block(&mut block);
///
/// voice.trigger_release(1);
/// assert_eq!(voice.state(), VoiceState::Releasing);
/// ```
#[derive(Debug, Clone)]
pub struct Voice {
    oscillators: Vec<Oscillator>,
    note: Option<u8>,
    velocity: f32,
    base_frequency: f32,
    /// Order stamp of the last note-on
    trigger_order: u64,
    /// Order stamp of the last note-off, `None` while held
    release_order: Option<u64>,
}

impl Voice {
    /// Create an idle voice with `oscillator_count` oscillators.
    pub fn new(oscillator_count: usize, sample_rate: f32) -> Self {
        Self {
            oscillators: (0..oscillator_count)
                .map(|_| Oscillator::new(sample_rate))
                .collect(),
            note: None,
            velocity: 0.0,
            base_frequency: 0.0,
            trigger_order: 0,
            release_order: None,
        }
    }

    /// Set sample rate for every oscillator and envelope.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for osc in &mut self.oscillators {
            osc.set_sample_rate(sample_rate);
        }
    }

    /// Start `note` at `velocity` (0.0 to 1.0).
    ///
    /// Every oscillator restarts at phase zero; envelopes resume from their
    /// current level so a retrigger or steal does not click.
    pub fn trigger_attack(&mut self, note: u8, velocity: f32, order: u64) {
        let note = note.min(127);
        self.note = Some(note);
        self.velocity = if velocity.is_nan() {
            0.0
        } else {
            velocity.clamp(0.0, 1.0)
        };
        self.base_frequency = midi_to_freq(note);
        self.trigger_order = order;
        self.release_order = None;
        for osc in &mut self.oscillators {
            osc.trigger();
        }
    }

    /// Release the held note. The voice keeps sounding until every envelope
    /// has finished. No-op when not held.
    pub fn trigger_release(&mut self, order: u64) {
        if !self.is_held() {
            return;
        }
        self.release_order = Some(order);
        for osc in &mut self.oscillators {
            osc.release();
        }
    }

    /// Silence immediately and forget the note.
    pub fn kill(&mut self) {
        for osc in &mut self.oscillators {
            osc.reset();
        }
        self.note = None;
        self.velocity = 0.0;
        self.release_order = None;
    }

    /// Whether this voice can play `note`.
    ///
    /// Every voice is interchangeable, so any MIDI note is accepted as long as
    /// the voice has at least one oscillator.
    pub fn can_play(&self, note: u8) -> bool {
        note <= 127 && !self.oscillators.is_empty()
    }

    /// No note assigned and every envelope idle.
    pub fn is_idle(&self) -> bool {
        self.note.is_none() && self.oscillators.iter().all(|o| o.envelope().is_idle())
    }

    /// Note assigned and not yet released.
    pub fn is_held(&self) -> bool {
        self.note.is_some() && self.release_order.is_none()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> VoiceState {
        if self.is_held() {
            VoiceState::Playing
        } else if self.is_idle() {
            VoiceState::Idle
        } else {
            VoiceState::Releasing
        }
    }

    /// Assigned MIDI note, `None` when idle.
    pub fn note(&self) -> Option<u8> {
        self.note
    }

    /// Note velocity (0.0 to 1.0).
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Base frequency of the assigned note in Hz.
    pub fn base_frequency(&self) -> f32 {
        self.base_frequency
    }

    /// Order stamp of the last note-on.
    pub fn trigger_order(&self) -> u64 {
        self.trigger_order
    }

    /// Order stamp of the last note-off, `None` unless releasing.
    pub fn release_order(&self) -> Option<u64> {
        self.release_order
    }

    /// Number of oscillators in this voice.
    pub fn oscillator_count(&self) -> usize {
        self.oscillators.len()
    }

    /// All oscillators.
    pub fn oscillators(&self) -> &[Oscillator] {
        &self.oscillators
    }

    /// Oscillator at `index`.
    pub fn oscillator(&self, index: usize) -> Option<&Oscillator> {
        self.oscillators.get(index)
    }

    /// Mutable oscillator at `index`.
    pub fn oscillator_mut(&mut self, index: usize) -> Option<&mut Oscillator> {
        self.oscillators.get_mut(index)
    }

    /// Apply per-slot settings. Slices shorter than the oscillator bank leave
    /// the remaining oscillators untouched.
    pub fn apply_settings(&mut self, oscillators: &[OscillatorSettings], envelopes: &[AdsrSettings]) {
        for (osc, settings) in self.oscillators.iter_mut().zip(oscillators) {
            osc.apply_settings(settings);
        }
        for (osc, adsr) in self.oscillators.iter_mut().zip(envelopes) {
            osc.set_adsr(adsr);
        }
    }

    /// Render `buffer.len()` samples, overwriting `buffer`.
    ///
    /// A released voice whose envelopes have all finished drops its note and
    /// becomes idle at the end of the block.
    pub fn render_block(&mut self, buffer: &mut [f32]) {
        let base = self.base_frequency;
        let velocity = self.velocity;
        for sample in buffer.iter_mut() {
            let mut sum = 0.0;
            for osc in &mut self.oscillators {
                sum += osc.render_sample(base);
            }
            *sample = flush_denormal(sum * velocity);
        }

        if self.release_order.is_some()
            && self.oscillators.iter().all(|o| o.envelope().is_idle())
        {
            self.note = None;
            self.release_order = None;
        }
    }
}
