//! Polyosc Synth - polyphonic multi-oscillator voice engine
//!
//! Renders blocks of audio from note events and per-oscillator parameters.
//! Every voice owns the same fixed bank of oscillators; every oscillator has
//! its own waveform, tuning, gain, FM sub-oscillator and ADSR envelope.
//!
//! # Components
//!
//! Leaf first:
//!
//! - [`AdsrEnvelope`] - Linear attack/decay/sustain/release amplitude envelope
//! - [`Oscillator`] - Sine/saw/square with octave, semitone and cents offsets, FM and gain
//! - [`Voice`] - Fixed oscillator bank playing one note
//! - [`VoicePool`] - Allocation, stealing and mixing over a fixed set of voices
//! - [`SnapshotApplier`] - Captures a [`ParamSnapshot`] from a [`ParamSource`] once per block
//! - [`Engine`] - Host-facing façade with multi-channel output
//!
//! # Real-Time Safety
//!
//! All allocation happens in [`Engine::new`] and [`Engine::prepare`].
//! [`Engine::process`] and everything it calls run without allocating,
//! locking or failing: out-of-range parameters are clamped, unmatched
//! note-offs are ignored and a saturated pool always finds a voice.
//!
//! # Parameters
//!
//! The engine reads parameters through the [`ParamSource`] trait using
//! index keys ([`ParamKey`] = oscillator slot + [`ParamKind`]). A
//! [`ParamSnapshot`] is itself a source, usable as a fixed patch; hosts
//! typically supply a lock-free atomic store instead.
//!
//! # no_std Support
//!
//! This crate needs only `alloc`. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! polyosc-synth = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use polyosc_synth::{Engine, EngineConfig, NoteEvent, ParamSnapshot, Waveform};
//!
//! let mut engine = Engine::new(EngineConfig::with_counts(8, 2)).unwrap();
//!
//! let mut patch = ParamSnapshot::new(2);
//! patch.oscillators_mut()[0].waveform = Waveform::Saw;
//! patch.oscillators_mut()[1].octave = -1;
//!
//! // C major chord
//! let events = [
//!     NoteEvent::note_on(60, 0.8, 0),
//!     NoteEvent::note_on(64, 0.8, 0),
//!     NoteEvent::note_on(67, 0.8, 0),
//! ];
//!
//! let mut block = vec![0.0_f32; 512];
//! engine.process_mono(&patch, &mut block, &events);
//! assert!(block.iter().any(|&s| s != 0.0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod config;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod event;
pub mod oscillator;
pub mod pool;
pub mod snapshot;
pub mod voice;

// Re-export main types at crate root
pub use config::EngineConfig;
pub use engine::Engine;
pub use envelope::{AdsrEnvelope, AdsrSettings, EnvelopeState, SILENCE_THRESHOLD};
pub use error::EngineError;
pub use event::{NoteEvent, NoteEventKind};
pub use oscillator::{Oscillator, OscillatorSettings, Waveform};
pub use pool::VoicePool;
pub use snapshot::{ParamKey, ParamKind, ParamSnapshot, ParamSource, SnapshotApplier};
pub use voice::{Voice, VoiceState};

// Re-export pitch helpers from polyosc-core
pub use polyosc_core::{cents_to_ratio, midi_to_freq, tuning_ratio};
