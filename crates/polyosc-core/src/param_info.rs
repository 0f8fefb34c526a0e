//! Parameter descriptors for discoverable synth parameters.
//!
//! Every externally controllable value of the engine is described by a
//! [`ParamDescriptor`]: display names, unit, range, default, step and a stable
//! [`ParamId`]. Collaborators (parameter stores, preset files, host wrappers)
//! build their tables from these descriptors; the engine itself only sees the
//! resulting numbers.
//!
//! - [`ParamId`] - stable numeric ID for automation and state persistence
//! - [`ParamScale`] - normalization curve (linear, logarithmic, power)
//! - [`ParamFlags`] - capability flags (automatable, stepped, ...)
//! - `string_id` - human-readable stable ID for presets and debugging
//! - `group` - parameter grouping for host tree display
//!
//! # Example
//!
//! ```rust
//! use polyosc_core::{ParamDescriptor, ParamId, ParamScale};
//!
//! let fm = ParamDescriptor::frequency_hz("FM Frequency", "FM Freq", 0.0, 1000.0, 5.0)
//!     .with_id(ParamId(106), "fm_freq")
//!     .with_scale(ParamScale::Power(1.0 / 0.3));
//!
//! assert_eq!(fm.clamp(2000.0), 1000.0);
//! assert!((fm.denormalize(fm.normalize(250.0)) - 250.0).abs() < 0.01);
//! ```
//!
//! # no_std Support
//!
//! This module is fully `no_std` compatible with no heap allocations required.

/// Scaling curve for parameter normalization.
///
/// Determines how a parameter's plain value maps to normalized \[0.0, 1.0\] space.
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Power(exp)**: `normalized = ((value - min) / (max - min)).powf(1.0 / exp)`
///
/// A JUCE-style skew factor `s` corresponds to `Power(1.0 / s)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Linear mapping (default).
    #[default]
    Linear,
    /// Power curve mapping. exponent > 1.0 gives more resolution at the low end
    /// of the plain range.
    Power(f32),
}

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter: saved
/// state blobs are keyed by it.
///
/// # Convention
///
/// Each oscillator slot gets a base of `(slot + 1) * 100`; the twelve
/// per-oscillator parameters follow sequentially:
/// - Oscillator 0: 100..=111
/// - Oscillator 1: 200..=211
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// Use [`union`](Self::union) to combine.
///
/// # Example
///
/// ```rust
/// use polyosc_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::AUTOMATABLE));
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!ParamFlags::NONE.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete steps (enum-like, integer values).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// # Short Name
///
/// `short_name` should be 8 characters or less so it fits hardware
/// controller displays.
///
/// # Step Size
///
/// `step` is the recommended increment for encoder-based control. Stepped
/// parameters (waveform, octave, semitone, on/off) use `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Attack", "FM Depth").
    pub name: &'static str,

    /// Short name for hardware displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Default value on construction or reset.
    pub default: f32,

    /// Recommended step increment.
    pub step: f32,

    /// Stable numeric ID for automation and state persistence.
    ///
    /// Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Human-readable stable ID (e.g., `"osc0_attack"`).
    ///
    /// Default: `""` (unassigned).
    pub string_id: &'static str,

    /// Normalization curve.
    pub scale: ParamScale,

    /// Capability flags.
    pub flags: ParamFlags,

    /// Parameter group for host tree display (e.g., `"Oscillator 1"`).
    pub group: &'static str,
}

impl ParamDescriptor {
    /// Continuous parameter with no unit.
    const fn plain(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
        step: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
            group: "",
        }
    }

    /// Dimensionless level in `[min, max]` (gain, sustain), step 0.01.
    pub const fn level(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::plain(name, short_name, ParamUnit::None, min, max, default, 0.01)
    }

    /// Time parameter in seconds, step 0.01.
    pub const fn time_s(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::plain(name, short_name, ParamUnit::Seconds, min, max, default, 0.01)
    }

    /// Frequency parameter in Hz, step 0.1.
    pub const fn frequency_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::plain(name, short_name, ParamUnit::Hertz, min, max, default, 0.1)
    }

    /// Integer-valued parameter (step 1.0, [`ParamFlags::STEPPED`]).
    ///
    /// Used for waveform selectors, octave and semitone offsets.
    pub const fn stepped(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::plain(name, short_name, unit, min, max, default, 1.0)
            .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED))
    }

    /// On/off switch stored as `0.0` / `1.0`.
    pub const fn toggle(name: &'static str, short_name: &'static str, on: bool) -> Self {
        Self::stepped(
            name,
            short_name,
            ParamUnit::None,
            0.0,
            1.0,
            if on { 1.0 } else { 0.0 },
        )
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// # Example
    ///
    /// ```rust
    /// use polyosc_core::{ParamDescriptor, ParamId};
    ///
    /// let desc = ParamDescriptor::level("Gain", "Gain", 0.0, 1.0, 0.5)
    ///     .with_id(ParamId(105), "osc0_gain");
    /// assert_eq!(desc.id, ParamId(105));
    /// assert_eq!(desc.string_id, "osc0_gain");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the normalization scale.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the parameter flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the parameter group.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// NaN maps to the default so a corrupt input never reaches the engine.
    ///
    /// # Example
    ///
    /// ```rust
    /// use polyosc_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::time_s("Release", "Rel", 0.1, 3.0, 0.4);
    /// assert_eq!(desc.clamp(1.0), 1.0);
    /// assert_eq!(desc.clamp(-1.0), 0.1);
    /// assert_eq!(desc.clamp(10.0), 3.0);
    /// assert_eq!(desc.clamp(f32::NAN), 0.4);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Converts a plain value to normalized range (0.0 to 1.0).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let value = self.clamp(value);
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Power(exp) => {
                let linear = (value - self.min) / range;
                libm::powf(linear, 1.0 / exp)
            }
        }
    }

    /// Converts a normalized value (0.0 to 1.0) to the plain range.
    ///
    /// Inverse of [`normalize`](Self::normalize). Input outside `[0, 1]` is
    /// clamped first.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        };
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Power(exp) => {
                let curved = libm::powf(normalized, exp);
                self.min + curved * (self.max - self.min)
            }
        }
    }

    /// Returns `true` if the parameter has discrete integer steps.
    #[inline]
    pub const fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz (Hz) - FM modulator frequency and depth.
    Hertz,

    /// Seconds (s) - envelope segment times.
    Seconds,

    /// Octaves - coarse pitch offset.
    Octaves,

    /// Semitones (st) - pitch offset in equal-tempered steps.
    Semitones,

    /// Cents (ct) - fine detune, 100 per semitone.
    Cents,

    /// No unit - levels, switches and selectors.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// # Example
    ///
    /// ```rust
    /// use polyosc_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Seconds.suffix(), " s");
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Seconds => " s",
            ParamUnit::Octaves => " oct",
            ParamUnit::Semitones => " st",
            ParamUnit::Cents => " ct",
            ParamUnit::None => "",
        }
    }
}
