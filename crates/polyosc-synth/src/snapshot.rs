//! Per-block parameter snapshot and the source trait it is captured from.
//!
//! The engine never looks parameters up by name. A [`ParamSource`] answers
//! index-keyed queries ([`ParamKey`]); once per block the [`SnapshotApplier`]
//! reads every key into a pre-allocated [`ParamSnapshot`] and pushes it into
//! every voice before any sample is rendered.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use libm::roundf;

use crate::envelope::AdsrSettings;
use crate::oscillator::{OscillatorSettings, Waveform};
use crate::pool::VoicePool;

/// The twelve parameters every oscillator slot exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Waveform selector (0 = Sine, 1 = Saw, 2 = Square).
    Waveform,
    /// On/off switch (≥ 0.5 is on).
    Enabled,
    /// Octave offset.
    Octave,
    /// Semitone offset.
    Semitone,
    /// Fine detune in cents.
    Detune,
    /// Output gain.
    Gain,
    /// FM sub-oscillator frequency in Hz.
    FmFrequency,
    /// FM depth in Hz.
    FmDepth,
    /// Envelope attack in seconds.
    Attack,
    /// Envelope decay in seconds.
    Decay,
    /// Envelope sustain level.
    Sustain,
    /// Envelope release in seconds.
    Release,
}

impl ParamKind {
    /// Number of kinds per oscillator slot.
    pub const COUNT: usize = 12;

    /// Every kind in index order.
    pub const ALL: [ParamKind; Self::COUNT] = [
        ParamKind::Waveform,
        ParamKind::Enabled,
        ParamKind::Octave,
        ParamKind::Semitone,
        ParamKind::Detune,
        ParamKind::Gain,
        ParamKind::FmFrequency,
        ParamKind::FmDepth,
        ParamKind::Attack,
        ParamKind::Decay,
        ParamKind::Sustain,
        ParamKind::Release,
    ];

    /// Stable index within a slot (0..12).
    pub const fn index(self) -> usize {
        match self {
            ParamKind::Waveform => 0,
            ParamKind::Enabled => 1,
            ParamKind::Octave => 2,
            ParamKind::Semitone => 3,
            ParamKind::Detune => 4,
            ParamKind::Gain => 5,
            ParamKind::FmFrequency => 6,
            ParamKind::FmDepth => 7,
            ParamKind::Attack => 8,
            ParamKind::Decay => 9,
            ParamKind::Sustain => 10,
            ParamKind::Release => 11,
        }
    }

    /// Kind for a stable index.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Stable identifier suffix (e.g. `"attack"`), used in string IDs.
    pub const fn key(self) -> &'static str {
        match self {
            ParamKind::Waveform => "wave",
            ParamKind::Enabled => "on",
            ParamKind::Octave => "octave",
            ParamKind::Semitone => "semi",
            ParamKind::Detune => "detune",
            ParamKind::Gain => "gain",
            ParamKind::FmFrequency => "fm_freq",
            ParamKind::FmDepth => "fm_depth",
            ParamKind::Attack => "attack",
            ParamKind::Decay => "decay",
            ParamKind::Sustain => "sustain",
            ParamKind::Release => "release",
        }
    }

    /// Whether this kind belongs to the envelope rather than the oscillator.
    pub const fn is_envelope(self) -> bool {
        matches!(
            self,
            ParamKind::Attack | ParamKind::Decay | ParamKind::Sustain | ParamKind::Release
        )
    }
}

/// Address of one external parameter: oscillator slot plus kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamKey {
    /// Oscillator slot (0-based).
    pub oscillator: usize,
    /// Parameter within the slot.
    pub kind: ParamKind,
}

impl ParamKey {
    /// Key for `kind` on `oscillator`.
    pub const fn new(oscillator: usize, kind: ParamKind) -> Self {
        Self { oscillator, kind }
    }

    /// Flat index `oscillator × 12 + kind`.
    pub const fn flat_index(self) -> usize {
        self.oscillator * ParamKind::COUNT + self.kind.index()
    }

    /// Inverse of [`flat_index`](Self::flat_index).
    pub const fn from_flat_index(index: usize) -> Self {
        Self {
            oscillator: index / ParamKind::COUNT,
            kind: ParamKind::ALL[index % ParamKind::COUNT],
        }
    }
}

/// Where the engine reads its parameters from.
///
/// Called once per key per block on the render thread, so implementations
/// must not block or allocate. Values are expected in their declared ranges;
/// the engine clamps anyway.
pub trait ParamSource {
    /// Number of oscillator slots the source describes.
    fn oscillator_count(&self) -> usize;

    /// Current plain value for `key`.
    fn value(&self, key: ParamKey) -> f32;
}

impl<T: ParamSource + ?Sized> ParamSource for &T {
    fn oscillator_count(&self) -> usize {
        (**self).oscillator_count()
    }

    fn value(&self, key: ParamKey) -> f32 {
        (**self).value(key)
    }
}

/// Structure-of-arrays parameter values for one render block.
///
/// One [`OscillatorSettings`] and one [`AdsrSettings`] per oscillator slot.
/// A snapshot is also a [`ParamSource`], which makes it a convenient fixed
/// patch for offline rendering and tests.
///
/// # Example
///
/// ```rust
/// use polyosc_synth::{OscillatorSettings, ParamKey, ParamKind, ParamSnapshot, ParamSource, Waveform};
///
/// let mut patch = ParamSnapshot::new(2);
/// patch.oscillators_mut()[1] = OscillatorSettings { waveform: Waveform::Saw, ..Default::default() };
///
/// assert_eq!(patch.value(ParamKey::new(1, ParamKind::Waveform)), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSnapshot {
    oscillators: Vec<OscillatorSettings>,
    envelopes: Vec<AdsrSettings>,
}

impl ParamSnapshot {
    /// Snapshot with `slots` default oscillator and envelope settings.
    pub fn new(slots: usize) -> Self {
        Self {
            oscillators: (0..slots).map(|_| OscillatorSettings::default()).collect(),
            envelopes: (0..slots).map(|_| AdsrSettings::default()).collect(),
        }
    }

    /// Number of oscillator slots.
    pub fn slots(&self) -> usize {
        self.oscillators.len()
    }

    /// Oscillator settings per slot.
    pub fn oscillators(&self) -> &[OscillatorSettings] {
        &self.oscillators
    }

    /// Mutable oscillator settings per slot.
    pub fn oscillators_mut(&mut self) -> &mut [OscillatorSettings] {
        &mut self.oscillators
    }

    /// Envelope settings per slot.
    pub fn envelopes(&self) -> &[AdsrSettings] {
        &self.envelopes
    }

    /// Mutable envelope settings per slot.
    pub fn envelopes_mut(&mut self) -> &mut [AdsrSettings] {
        &mut self.envelopes
    }

    /// Refresh every slot from `source` without allocating.
    ///
    /// Slots the source does not describe are disabled and their envelopes
    /// keep default timing.
    pub fn capture<S: ParamSource + ?Sized>(&mut self, source: &S) {
        let available = source.oscillator_count();
        for (slot, (osc, env)) in self
            .oscillators
            .iter_mut()
            .zip(self.envelopes.iter_mut())
            .enumerate()
        {
            if slot >= available {
                *osc = OscillatorSettings::disabled();
                *env = AdsrSettings::default();
                continue;
            }
            let get = |kind| source.value(ParamKey::new(slot, kind));
            *osc = OscillatorSettings {
                waveform: waveform_from_value(get(ParamKind::Waveform)),
                enabled: get(ParamKind::Enabled) >= 0.5,
                octave: round_to_int(get(ParamKind::Octave)),
                semitone: round_to_int(get(ParamKind::Semitone)),
                detune_cents: get(ParamKind::Detune),
                gain: get(ParamKind::Gain),
                fm_frequency: get(ParamKind::FmFrequency),
                fm_depth: get(ParamKind::FmDepth),
            };
            *env = AdsrSettings {
                attack: get(ParamKind::Attack),
                decay: get(ParamKind::Decay),
                sustain: get(ParamKind::Sustain),
                release: get(ParamKind::Release),
            }
            .clamped();
        }
    }
}

impl ParamSource for ParamSnapshot {
    fn oscillator_count(&self) -> usize {
        self.oscillators.len()
    }

    fn value(&self, key: ParamKey) -> f32 {
        let (Some(osc), Some(env)) = (
            self.oscillators.get(key.oscillator),
            self.envelopes.get(key.oscillator),
        ) else {
            return 0.0;
        };
        match key.kind {
            ParamKind::Waveform => osc.waveform.index() as f32,
            ParamKind::Enabled => {
                if osc.enabled {
                    1.0
                } else {
                    0.0
                }
            }
            ParamKind::Octave => osc.octave as f32,
            ParamKind::Semitone => osc.semitone as f32,
            ParamKind::Detune => osc.detune_cents,
            ParamKind::Gain => osc.gain,
            ParamKind::FmFrequency => osc.fm_frequency,
            ParamKind::FmDepth => osc.fm_depth,
            ParamKind::Attack => env.attack,
            ParamKind::Decay => env.decay,
            ParamKind::Sustain => env.sustain,
            ParamKind::Release => env.release,
        }
    }
}

#[inline]
fn round_to_int(value: f32) -> i32 {
    // `as` saturates and maps NaN to 0
    roundf(value) as i32
}

#[inline]
fn waveform_from_value(value: f32) -> Waveform {
    Waveform::from_index(round_to_int(value).max(0) as usize)
}

/// Captures a [`ParamSnapshot`] each block and pushes it into every voice.
#[derive(Debug, Clone)]
pub struct SnapshotApplier {
    snapshot: ParamSnapshot,
}

impl SnapshotApplier {
    /// Applier for voices with `oscillators_per_voice` oscillators.
    pub fn new(oscillators_per_voice: usize) -> Self {
        Self {
            snapshot: ParamSnapshot::new(oscillators_per_voice),
        }
    }

    /// Read every parameter from `source` and push the values into `pool`.
    ///
    /// Real-time safe: no allocation, no locking.
    pub fn apply<S: ParamSource + ?Sized>(&mut self, source: &S, pool: &mut VoicePool) {
        self.snapshot.capture(source);
        pool.apply_snapshot(&self.snapshot);
    }

    /// The most recently captured snapshot.
    pub fn snapshot(&self) -> &ParamSnapshot {
        &self.snapshot
    }
}
