//! Pitch and numeric helpers for real-time synthesis.
//!
//! All functions are allocation-free and `no_std` compatible.
//!
//! # Pitch
//!
//! - [`midi_to_freq`] - MIDI note number → Hz
//! - [`cents_to_ratio`] - Cents → frequency ratio (1200 cents per octave)
//! - [`tuning_ratio`] - Octave + semitone + cents offsets as one ratio
//!
//! # Utilities
//!
//! - [`rem_euclid_f32`] - Euclidean remainder for phase wrapping
//! - [`flush_denormal`] - Zero out subnormal values

use libm::{exp2f, floorf};

/// Reference pitch for A4 (MIDI note 69) in Hz.
pub const A4_FREQ: f32 = 440.0;

/// Convert a MIDI note number to frequency in Hz.
///
/// Uses standard tuning: A4 (note 69) = 440 Hz.
///
/// # Example
/// ```rust
/// use polyosc_core::midi_to_freq;
///
/// assert!((midi_to_freq(69) - 440.0).abs() < 0.001);
/// assert!((midi_to_freq(81) - 880.0).abs() < 0.01);
/// ```
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    A4_FREQ * exp2f((f32::from(note) - 69.0) / 12.0)
}

/// Convert cents to a frequency ratio.
///
/// 100 cents = 1 semitone, 1200 cents = 1 octave.
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    exp2f(cents / 1200.0)
}

/// Frequency ratio for an octave, semitone and cents offset.
///
/// Equal to `2^octave × 2^(semitone/12) × 2^(cents/1200)`, evaluated as a
/// single power of two over the summed cents so the three offsets compose
/// without accumulating rounding from three separate `powf` calls.
///
/// # Example
/// ```rust
/// use polyosc_core::tuning_ratio;
///
/// assert!((tuning_ratio(1, 0, 0.0) - 2.0).abs() < 1e-6);
/// assert!((tuning_ratio(0, 12, 0.0) - 2.0).abs() < 1e-6);
/// assert!((tuning_ratio(0, 0, 1200.0) - 2.0).abs() < 1e-6);
/// ```
#[inline]
pub fn tuning_ratio(octave: i32, semitone: i32, cents: f32) -> f32 {
    let total_cents = octave as f32 * 1200.0 + semitone as f32 * 100.0 + cents;
    exp2f(total_cents / 1200.0)
}

/// Euclidean remainder for f32, compatible with no_std.
///
/// Result is always in `[0, b)` for positive `b`.
#[inline]
pub fn rem_euclid_f32(a: f32, b: f32) -> f32 {
    let r = a - b * floorf(a / b);
    if r < 0.0 {
        r + b
    } else if r >= b {
        r - b
    } else {
        r
    }
}

/// Flush denormal (subnormal) floats to zero.
///
/// Voice mixes decay toward zero at the tail of a release; subnormal values
/// there cost up to 100x on some CPUs.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
