//! Polyosc Core - shared primitives for the polyosc synthesizer engine
//!
//! This crate holds the small, allocation-free building blocks shared by the
//! engine and its collaborators.
//!
//! # Parameter Descriptors
//!
//! - [`ParamDescriptor`] - Range, default, unit and stable ID of one parameter
//! - [`ParamId`] - Stable numeric ID used for persistence and host automation
//! - [`ParamUnit`] / [`ParamScale`] / [`ParamFlags`] - Display and normalization metadata
//!
//! # Pitch Math
//!
//! - [`midi_to_freq`] - Equal-tempered note conversion (A4 = 440 Hz)
//! - [`cents_to_ratio`] - Cents to frequency ratio
//! - [`tuning_ratio`] - Combined octave/semitone/cents ratio
//! - [`flush_denormal`] - Subnormal guard for feedback-free accumulators
//!
//! # no_std Support
//!
//! Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! polyosc-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use polyosc_core::{midi_to_freq, tuning_ratio};
//!
//! let a4 = midi_to_freq(69);
//! let up_an_octave = a4 * tuning_ratio(1, 0, 0.0);
//! assert!((up_an_octave - 880.0).abs() < 0.01);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod math;
pub mod param_info;

pub use math::{cents_to_ratio, flush_denormal, midi_to_freq, rem_euclid_f32, tuning_ratio};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit};
