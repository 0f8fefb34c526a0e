//! Audio-rate oscillator with tuning, FM and its own amplitude envelope.
//!
//! Saw and square use PolyBLEP (Polynomial Band-Limited Step) correction to
//! reduce aliasing; sine is generated directly.

use core::f32::consts::PI;

use libm::sinf;
use polyosc_core::{rem_euclid_f32, tuning_ratio};

use crate::envelope::{AdsrEnvelope, AdsrSettings};

/// Octave offset range.
pub const OCTAVE_RANGE: (i32, i32) = (-4, 4);
/// Semitone offset range.
pub const SEMITONE_RANGE: (i32, i32) = (-12, 12);
/// Fine detune range in cents.
pub const DETUNE_RANGE: (f32, f32) = (-100.0, 100.0);
/// Upper bound for FM modulator frequency and FM depth, in Hz.
pub const FM_MAX_HZ: f32 = 1000.0;

/// Oscillator waveform types
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Waveform {
    /// Sine waveform, pure fundamental tone.
    #[default]
    Sine,
    /// Sawtooth waveform, all harmonics.
    Saw,
    /// Square waveform (50% duty cycle), odd harmonics.
    Square,
}

impl Waveform {
    /// All waveforms in selector order.
    pub const ALL: [Waveform; 3] = [Waveform::Sine, Waveform::Saw, Waveform::Square];

    /// Selector index (Sine = 0, Saw = 1, Square = 2).
    pub const fn index(self) -> usize {
        match self {
            Waveform::Sine => 0,
            Waveform::Saw => 1,
            Waveform::Square => 2,
        }
    }

    /// Waveform for a selector index. Out-of-range indices saturate to the
    /// nearest valid entry.
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Waveform::Sine,
            1 => Waveform::Saw,
            _ => Waveform::Square,
        }
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Saw => "Saw",
            Waveform::Square => "Square",
        }
    }
}

/// Settings for one oscillator slot, shared by that slot in every voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscillatorSettings {
    /// Waveform shape.
    pub waveform: Waveform,
    /// Whether the oscillator produces sound.
    pub enabled: bool,
    /// Octave offset, -4..=4.
    pub octave: i32,
    /// Semitone offset, -12..=12.
    pub semitone: i32,
    /// Fine detune in cents, -100..=100.
    pub detune_cents: f32,
    /// Output gain, 0..=1.
    pub gain: f32,
    /// FM sub-oscillator frequency in Hz.
    pub fm_frequency: f32,
    /// FM depth: peak carrier deviation in Hz.
    pub fm_depth: f32,
}

impl Default for OscillatorSettings {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            enabled: true,
            octave: 0,
            semitone: 0,
            detune_cents: 0.0,
            gain: 0.5,
            fm_frequency: 5.0,
            fm_depth: 0.0,
        }
    }
}

impl OscillatorSettings {
    /// Settings for a slot that contributes nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

#[inline]
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// One oscillator of a voice.
///
/// The output of [`render_sample`](Self::render_sample) is already shaped by
/// the oscillator's envelope and gain, so a voice only has to sum its
/// oscillators.
///
/// # Frequency
///
/// ```text
/// effective     = base × 2^octave × 2^(semitone/12) × 2^(cents/1200)
/// instantaneous = effective + fm_depth × sin(2π · fm_phase)
/// ```
///
/// The tuning ratio is cached and only recomputed by [`set_tuning`](Self::set_tuning).
///
/// # Example
///
/// ```rust
/// use polyosc_synth::{Oscillator, Waveform};
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_waveform(Waveform::Saw);
/// osc.set_tuning(1, 0, 0.0);
/// assert!((osc.effective_frequency(440.0) - 880.0).abs() < 0.01);
///
/// osc.trigger();
/// let sample = osc.render_sample(440.0);
/// assert!(sample.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Carrier phase [0.0, 1.0)
    phase: f32,
    /// FM sub-oscillator phase [0.0, 1.0)
    fm_phase: f32,
    sample_rate: f32,
    waveform: Waveform,
    enabled: bool,
    octave: i32,
    semitone: i32,
    detune_cents: f32,
    /// Cached `2^octave × 2^(semitone/12) × 2^(cents/1200)`
    ratio: f32,
    gain: f32,
    fm_frequency: f32,
    fm_depth: f32,
    envelope: AdsrEnvelope,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Oscillator {
    /// Create an oscillator with [`OscillatorSettings::default`] and
    /// [`AdsrSettings::default`].
    pub fn new(sample_rate: f32) -> Self {
        let defaults = OscillatorSettings::default();
        Self {
            phase: 0.0,
            fm_phase: 0.0,
            sample_rate,
            waveform: defaults.waveform,
            enabled: defaults.enabled,
            octave: defaults.octave,
            semitone: defaults.semitone,
            detune_cents: defaults.detune_cents,
            ratio: 1.0,
            gain: defaults.gain,
            fm_frequency: defaults.fm_frequency,
            fm_depth: defaults.fm_depth,
            envelope: AdsrEnvelope::new(sample_rate),
        }
    }

    /// Set waveform type.
    ///
    /// Takes effect on the next sample; switching mid-note may produce a
    /// single-sample discontinuity.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Get current waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Enable or disable the oscillator.
    ///
    /// A disabled oscillator outputs silence and its carrier and FM phases
    /// stand still; its envelope keeps running.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the oscillator produces sound.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set octave, semitone and cents offsets (clamped to their ranges).
    pub fn set_tuning(&mut self, octave: i32, semitone: i32, detune_cents: f32) {
        let octave = octave.clamp(OCTAVE_RANGE.0, OCTAVE_RANGE.1);
        let semitone = semitone.clamp(SEMITONE_RANGE.0, SEMITONE_RANGE.1);
        let detune_cents = finite_or(detune_cents, 0.0).clamp(DETUNE_RANGE.0, DETUNE_RANGE.1);
        if octave == self.octave && semitone == self.semitone && detune_cents == self.detune_cents
        {
            return;
        }
        self.octave = octave;
        self.semitone = semitone;
        self.detune_cents = detune_cents;
        self.ratio = tuning_ratio(octave, semitone, detune_cents);
    }

    /// Current `(octave, semitone, cents)` offsets.
    pub fn tuning(&self) -> (i32, i32, f32) {
        (self.octave, self.semitone, self.detune_cents)
    }

    /// Cached tuning ratio.
    pub fn tuning_ratio(&self) -> f32 {
        self.ratio
    }

    /// Set output gain (0.0 to 1.0).
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = finite_or(gain, 0.0).clamp(0.0, 1.0);
    }

    /// Current output gain.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Set FM sub-oscillator frequency and depth, both in Hz (0 to [`FM_MAX_HZ`]).
    pub fn set_fm(&mut self, frequency: f32, depth: f32) {
        self.fm_frequency = finite_or(frequency, 0.0).clamp(0.0, FM_MAX_HZ);
        self.fm_depth = finite_or(depth, 0.0).clamp(0.0, FM_MAX_HZ);
    }

    /// Current `(frequency, depth)` of the FM sub-oscillator.
    pub fn fm(&self) -> (f32, f32) {
        (self.fm_frequency, self.fm_depth)
    }

    /// Apply envelope settings.
    pub fn set_adsr(&mut self, settings: &AdsrSettings) {
        self.envelope.set_adsr(settings);
    }

    /// Apply all oscillator settings at once.
    pub fn apply_settings(&mut self, settings: &OscillatorSettings) {
        self.set_waveform(settings.waveform);
        self.set_enabled(settings.enabled);
        self.set_tuning(settings.octave, settings.semitone, settings.detune_cents);
        self.set_gain(settings.gain);
        self.set_fm(settings.fm_frequency, settings.fm_depth);
    }

    /// Set sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.envelope.set_sample_rate(sample_rate);
    }

    /// Frequency this oscillator plays for a note at `base` Hz, before FM.
    #[inline]
    pub fn effective_frequency(&self, base: f32) -> f32 {
        base * self.ratio
    }

    /// The oscillator's envelope.
    pub fn envelope(&self) -> &AdsrEnvelope {
        &self.envelope
    }

    /// Current carrier phase.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Start a note: reset both phases and open the envelope gate.
    pub fn trigger(&mut self) {
        self.phase = 0.0;
        self.fm_phase = 0.0;
        self.envelope.gate_on();
    }

    /// Close the envelope gate.
    pub fn release(&mut self) {
        self.envelope.gate_off();
    }

    /// Silence immediately and reset phases.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.fm_phase = 0.0;
        self.envelope.reset();
    }

    /// Generate the next sample for a note at `base_frequency` Hz.
    ///
    /// The envelope always advances, so a disabled oscillator still follows
    /// the voice's note lifecycle.
    #[inline]
    pub fn render_sample(&mut self, base_frequency: f32) -> f32 {
        let level = self.envelope.advance();
        if !self.enabled {
            return 0.0;
        }

        let modulation = if self.fm_depth > 0.0 {
            self.fm_depth * sinf(2.0 * PI * self.fm_phase)
        } else {
            0.0
        };
        self.fm_phase = rem_euclid_f32(self.fm_phase + self.fm_frequency / self.sample_rate, 1.0);

        let dt = (self.effective_frequency(base_frequency) + modulation) / self.sample_rate;
        let sample = self.generate(self.phase, dt.abs().min(0.5));
        // Negative instantaneous frequency runs the phase backwards
        self.phase = rem_euclid_f32(self.phase + dt, 1.0);

        sample * level * self.gain
    }

    /// Generate the raw waveform at `phase` with PolyBLEP width `dt`.
    #[inline]
    fn generate(&self, phase: f32, dt: f32) -> f32 {
        match self.waveform {
            Waveform::Sine => sinf(phase * 2.0 * PI),

            Waveform::Saw => {
                let naive = 2.0 * phase - 1.0;
                naive - poly_blep(phase, dt)
            }

            Waveform::Square => {
                let naive = if phase < 0.5 { 1.0 } else { -1.0 };
                // Rising edge at 0, falling edge at 0.5
                naive + poly_blep(phase, dt) - poly_blep(rem_euclid_f32(phase + 0.5, 1.0), dt)
            }
        }
    }
}

/// 4th-order PolyBLEP correction.
///
/// C²-continuous degree-4 piecewise polynomial fitted to the ideal BLEP
/// residual, spanning two samples on each side of the discontinuity.
///
/// Reference: Välimäki et al., "Antialiasing Oscillators", IEEE Signal
/// Processing Magazine, 2010.
///
/// # Arguments
/// * `t` - Current phase position in [0.0, 1.0)
/// * `dt` - Phase increment per sample (frequency / sample_rate)
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    //   p₁(n) = A₄·n⁴ + A₃·n³ + A₂·n² + A₀  for n ∈ [0,1)
    //   p₂(n) = C·(2-n)⁴                      for n ∈ [1,2)
    const A4: f32 = -43.0 / 48.0;
    const A3: f32 = 7.0 / 6.0;
    const A2: f32 = 0.5;
    const A0: f32 = -1.0;
    const C: f32 = -11.0 / 48.0;

    if dt <= 0.0 {
        return 0.0;
    }

    let dt2 = 2.0 * dt;
    if t < dt2 {
        let n = t / dt;
        if n < 1.0 {
            let n2 = n * n;
            A4 * n2 * n2 + A3 * n2 * n + A2 * n2 + A0
        } else {
            let u = 2.0 - n;
            let u2 = u * u;
            C * u2 * u2
        }
    } else if t > 1.0 - dt2 {
        // Antisymmetric mirror before the discontinuity
        let n = (1.0 - t) / dt;
        if n < 1.0 {
            let n2 = n * n;
            -(A4 * n2 * n2 + A3 * n2 * n + A2 * n2 + A0)
        } else {
            let u = 2.0 - n;
            let u2 = u * u;
            -(C * u2 * u2)
        }
    } else {
        0.0
    }
}
