//! TOML patch presets.

use serde::{Deserialize, Serialize};
use std::path::Path;

use polyosc_synth::{EngineConfig, ParamKey, ParamKind, Waveform};

use crate::error::ParamsError;
use crate::layout::descriptor;
use crate::store::ParamStore;

/// A named patch: optional engine sizing plus per-oscillator settings.
///
/// # TOML Format
///
/// ```toml
/// name = "Detuned Saws"
/// description = "Two saws a few cents apart"
///
/// [engine]
/// voice_count = 8
/// oscillators_per_voice = 2
///
/// [[oscillators]]
/// waveform = "saw"
/// enabled = true
/// detune = -6.0
///
/// [[oscillators]]
/// waveform = "saw"
/// enabled = true
/// detune = 6.0
/// release = 1.2
/// ```
///
/// Missing oscillator fields take the parameter defaults. An omitted
/// `enabled` keeps the slot's own default, so the first slot sounds and the
/// rest stay silent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Engine sizing; hosts fall back to their own config when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineConfig>,

    /// Oscillator slots in order.
    #[serde(default)]
    pub oscillators: Vec<OscillatorPreset>,
}

/// Settings for one oscillator slot, in parameter units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OscillatorPreset {
    /// Waveform shape.
    pub waveform: Waveform,
    /// Whether the slot sounds. `None` keeps the slot's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Octave offset.
    pub octave: i32,
    /// Semitone offset.
    pub semitone: i32,
    /// Fine detune in cents.
    pub detune: f32,
    /// Output gain.
    pub gain: f32,
    /// FM sub-oscillator frequency in Hz.
    pub fm_frequency: f32,
    /// FM depth in Hz.
    pub fm_depth: f32,
    /// Attack time in seconds.
    pub attack: f32,
    /// Decay time in seconds.
    pub decay: f32,
    /// Sustain level.
    pub sustain: f32,
    /// Release time in seconds.
    pub release: f32,
}

impl Default for OscillatorPreset {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            enabled: None,
            octave: 0,
            semitone: 0,
            detune: 0.0,
            gain: 0.5,
            fm_frequency: 5.0,
            fm_depth: 0.0,
            attack: 0.1,
            decay: 0.1,
            sustain: 1.0,
            release: 0.4,
        }
    }
}

impl OscillatorPreset {
    /// Plain parameter value for `kind` in oscillator slot `slot`.
    ///
    /// An unset `enabled` resolves to the slot's layout default.
    pub fn value(&self, slot: usize, kind: ParamKind) -> f32 {
        match kind {
            ParamKind::Waveform => self.waveform.index() as f32,
            ParamKind::Enabled => match self.enabled {
                Some(true) => 1.0,
                Some(false) => 0.0,
                None => descriptor(ParamKey::new(slot, kind)).map_or(0.0, |d| d.default),
            },
            ParamKind::Octave => self.octave as f32,
            ParamKind::Semitone => self.semitone as f32,
            ParamKind::Detune => self.detune,
            ParamKind::Gain => self.gain,
            ParamKind::FmFrequency => self.fm_frequency,
            ParamKind::FmDepth => self.fm_depth,
            ParamKind::Attack => self.attack,
            ParamKind::Decay => self.decay,
            ParamKind::Sustain => self.sustain,
            ParamKind::Release => self.release,
        }
    }

    /// Read slot `slot` out of `store`.
    pub fn from_store(store: &ParamStore, slot: usize) -> Self {
        let get = |kind| store.get(ParamKey::new(slot, kind));
        Self {
            waveform: Waveform::from_index(get(ParamKind::Waveform).round().max(0.0) as usize),
            enabled: Some(get(ParamKind::Enabled) >= 0.5),
            octave: get(ParamKind::Octave).round() as i32,
            semitone: get(ParamKind::Semitone).round() as i32,
            detune: get(ParamKind::Detune),
            gain: get(ParamKind::Gain),
            fm_frequency: get(ParamKind::FmFrequency),
            fm_depth: get(ParamKind::FmDepth),
            attack: get(ParamKind::Attack),
            decay: get(ParamKind::Decay),
            sustain: get(ParamKind::Sustain),
            release: get(ParamKind::Release),
        }
    }
}

impl Preset {
    /// Create a new empty preset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            engine: None,
            oscillators: Vec::new(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach engine sizing.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Append an oscillator slot.
    pub fn with_oscillator(mut self, oscillator: OscillatorPreset) -> Self {
        self.oscillators.push(oscillator);
        self
    }

    /// Capture every slot of `store`.
    pub fn from_store(name: impl Into<String>, store: &ParamStore) -> Self {
        Self {
            oscillators: (0..store.layout().slots())
                .map(|slot| OscillatorPreset::from_store(store, slot))
                .collect(),
            ..Self::new(name)
        }
    }

    /// Write this preset into `store`.
    ///
    /// The store is reset to defaults first, so slots the preset does not
    /// mention end up at their defaults. Oscillators beyond the store's
    /// slot count are ignored. Values are clamped to their ranges.
    pub fn apply_to(&self, store: &ParamStore) {
        store.reset_to_defaults();
        for (slot, osc) in self
            .oscillators
            .iter()
            .take(store.layout().slots())
            .enumerate()
        {
            for kind in ParamKind::ALL {
                store.set(ParamKey::new(slot, kind), osc.value(slot, kind));
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(preset = %self.name, slots = self.oscillators.len(), "preset applied");
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ParamsError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ParamsError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ParamsError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ParamsError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ParamsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
