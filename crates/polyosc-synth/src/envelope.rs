//! Linear ADSR envelope generator.
//!
//! Each oscillator owns one [`AdsrEnvelope`]. Segments are straight lines so
//! that segment durations are exact: a release of `r` seconds reaches silence
//! `r · sample_rate` samples after gate-off, whatever level it started from.

/// Level at or below which a releasing envelope is considered silent.
pub const SILENCE_THRESHOLD: f32 = 1.0e-4;

/// Shortest accepted segment time in seconds.
pub const MIN_TIME_S: f32 = 0.0005;

/// Longest accepted segment time in seconds.
pub const MAX_TIME_S: f32 = 60.0;

/// ADSR envelope states
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Envelope is inactive, output is zero.
    #[default]
    Idle,
    /// Attack phase, output rises linearly toward 1.0.
    Attack,
    /// Decay phase, output falls linearly from 1.0 toward the sustain level.
    Decay,
    /// Sustain phase, output holds the sustain level while the gate is held.
    Sustain,
    /// Release phase, output falls linearly to zero after gate release.
    Release,
}

/// Attack, decay, sustain and release values for one envelope.
///
/// Times are in seconds, sustain is a level in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdsrSettings {
    /// Attack time in seconds.
    pub attack: f32,
    /// Decay time in seconds.
    pub decay: f32,
    /// Sustain level (0.0 to 1.0).
    pub sustain: f32,
    /// Release time in seconds.
    pub release: f32,
}

impl Default for AdsrSettings {
    /// Attack 0.1 s, decay 0.1 s, full sustain, release 0.4 s.
    fn default() -> Self {
        Self {
            attack: 0.1,
            decay: 0.1,
            sustain: 1.0,
            release: 0.4,
        }
    }
}

impl AdsrSettings {
    /// Returns a copy with every field clamped to the range the envelope accepts.
    pub fn clamped(self) -> Self {
        Self {
            attack: clamp_time(self.attack),
            decay: clamp_time(self.decay),
            sustain: clamp_level(self.sustain),
            release: clamp_time(self.release),
        }
    }
}

#[inline]
fn clamp_time(seconds: f32) -> f32 {
    if seconds.is_nan() {
        MIN_TIME_S
    } else {
        seconds.clamp(MIN_TIME_S, MAX_TIME_S)
    }
}

#[inline]
fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

/// Linear ADSR envelope generator.
///
/// # Behavior
///
/// - Attack rises by `1 / (attack · sr)` per sample and hands over to decay at 1.0.
/// - Decay falls by `(1 − sustain) / (decay · sr)` per sample down to sustain.
/// - A sustain change while held slews to the new level at `1 / (decay · sr)`
///   per sample instead of jumping.
/// - Release falls from the gate-off level to zero over `release · sr`
///   samples; the slope is fixed when the gate closes.
/// - Gating on while sounding resumes from the current level.
///
/// # Example
///
/// ```rust
/// use polyosc_synth::{AdsrEnvelope, AdsrSettings, EnvelopeState};
///
/// let mut env = AdsrEnvelope::new(1000.0);
/// env.set_adsr(&AdsrSettings { attack: 0.01, decay: 0.01, sustain: 0.5, release: 0.1 });
///
/// env.gate_on();
/// for _ in 0..100 {
///     env.advance();
/// }
/// assert_eq!(env.state(), EnvelopeState::Sustain);
///
/// env.gate_off();
/// for _ in 0..100 {
///     env.advance();
/// }
/// assert!(env.is_idle());
/// ```
#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    state: EnvelopeState,
    level: f32,
    sample_rate: f32,
    settings: AdsrSettings,

    // Per-sample increments derived from settings and sample rate
    attack_step: f32,
    decay_step: f32,
    sustain_slew: f32,
    release_step: f32,
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl AdsrEnvelope {
    /// Create an idle envelope with [`AdsrSettings::default`].
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            state: EnvelopeState::Idle,
            level: 0.0,
            sample_rate,
            settings: AdsrSettings::default(),
            attack_step: 0.0,
            decay_step: 0.0,
            sustain_slew: 0.0,
            release_step: 0.0,
        };
        env.recalculate_steps();
        env
    }

    /// Apply new attack/decay/sustain/release values.
    ///
    /// Values are clamped to [`MIN_TIME_S`]..=[`MAX_TIME_S`] and `[0, 1]`.
    /// A release already in progress keeps the slope it started with.
    pub fn set_adsr(&mut self, settings: &AdsrSettings) {
        let settings = settings.clamped();
        if settings != self.settings {
            self.settings = settings;
            self.recalculate_steps();
        }
    }

    /// Current (clamped) settings.
    pub fn adsr(&self) -> AdsrSettings {
        self.settings
    }

    /// Set sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate == self.sample_rate {
            return;
        }
        self.sample_rate = sample_rate;
        self.recalculate_steps();
        if self.state == EnvelopeState::Release {
            self.release_step = self.level / self.samples_for(self.settings.release);
        }
    }

    /// Trigger the envelope (note on).
    ///
    /// The level is kept so a retrigger during release does not click.
    pub fn gate_on(&mut self) {
        self.state = EnvelopeState::Attack;
    }

    /// Release the envelope (note off).
    pub fn gate_off(&mut self) {
        if self.state != EnvelopeState::Idle && self.state != EnvelopeState::Release {
            self.state = EnvelopeState::Release;
            self.release_step = self.level / self.samples_for(self.settings.release);
        }
    }

    /// Force envelope to idle state.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.level = 0.0;
        self.release_step = 0.0;
    }

    /// Get current state.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Get current level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Check if the envelope has finished (idle state).
    pub fn is_idle(&self) -> bool {
        self.state == EnvelopeState::Idle
    }

    /// Advance envelope by one sample and return the new level.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.state {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level += self.attack_step;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.state = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                let sustain = self.settings.sustain;
                let next = self.level - self.decay_step;
                if next <= sustain {
                    // A sustain raised above the current level is reached by slewing
                    self.level = self.level.min(sustain);
                    self.state = EnvelopeState::Sustain;
                } else {
                    self.level = next;
                }
            }

            EnvelopeState::Sustain => {
                let target = self.settings.sustain;
                let diff = target - self.level;
                if diff.abs() <= self.sustain_slew {
                    self.level = target;
                } else if diff > 0.0 {
                    self.level += self.sustain_slew;
                } else {
                    self.level -= self.sustain_slew;
                }
            }

            EnvelopeState::Release => {
                self.level -= self.release_step;
                if self.level <= SILENCE_THRESHOLD {
                    self.level = 0.0;
                    self.state = EnvelopeState::Idle;
                }
            }
        }

        self.level
    }

    #[inline]
    fn samples_for(&self, seconds: f32) -> f32 {
        (seconds * self.sample_rate).max(1.0)
    }

    fn recalculate_steps(&mut self) {
        let AdsrSettings {
            attack,
            decay,
            sustain,
            ..
        } = self.settings;
        self.attack_step = 1.0 / self.samples_for(attack);
        self.decay_step = (1.0 - sustain) / self.samples_for(decay);
        self.sustain_slew = 1.0 / self.samples_for(decay);
    }
}
