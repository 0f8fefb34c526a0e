//! Parameter layout, storage, state and presets for the polyosc engine.
//!
//! The engine only knows the [`ParamSource`](polyosc_synth::ParamSource)
//! trait. This crate supplies everything a host needs around it:
//!
//! - **Layout**: stable IDs, ranges and defaults for every oscillator slot
//! - **Store**: lock-free atomic values shared between control and audio threads
//! - **State**: opaque JSON blobs for session save/restore
//! - **Presets**: named patches in TOML
//!
//! # Example
//!
//! ```rust
//! use polyosc_params::{ParamStore, Preset, load_state, save_state};
//! use polyosc_synth::{Engine, EngineConfig, NoteEvent, ParamKey, ParamKind};
//!
//! let store = ParamStore::new(2).unwrap();
//! store.set(ParamKey::new(0, ParamKind::Waveform), 1.0);
//!
//! let mut engine = Engine::new(EngineConfig::with_counts(8, 2)).unwrap();
//! let mut block = vec![0.0_f32; 256];
//! engine.process_mono(&store, &mut block, &[NoteEvent::note_on(60, 0.8, 0)]);
//!
//! let blob = save_state(&store).unwrap();
//! let restored = ParamStore::new(2).unwrap();
//! load_state(&restored, &blob).unwrap();
//!
//! let preset = Preset::from_store("Init", &restored);
//! assert_eq!(preset.oscillators.len(), 2);
//! ```

mod error;
mod preset;
mod store;

/// Parameter declarations and stable IDs.
pub mod layout;

/// State blob save/restore.
pub mod state;

pub use error::ParamsError;
pub use layout::{MAX_SLOTS, ParamLayout, descriptor, key_for_id, param_id};
pub use preset::{OscillatorPreset, Preset};
pub use state::{STATE_VERSION, load_state, save_state};
pub use store::ParamStore;
