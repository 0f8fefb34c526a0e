//! Parameter declarations for every oscillator slot.
//!
//! Each slot exposes the twelve [`ParamKind`]s. IDs are stable across
//! releases: slot `n` owns `(n + 1) * 100 ..= (n + 1) * 100 + 11`, and the
//! string ID is `osc{n}_{kind}` (e.g. `osc0_attack`). Flat indices follow
//! [`ParamKey::flat_index`].

use polyosc_core::{ParamDescriptor, ParamId, ParamScale, ParamUnit};
use polyosc_synth::{ParamKey, ParamKind};

use crate::error::ParamsError;

/// Largest number of oscillator slots a layout can describe.
pub const MAX_SLOTS: usize = 8;

/// Skew for the FM frequency and depth knobs: more travel near zero.
const FM_SCALE: ParamScale = ParamScale::Power(1.0 / 0.3);

macro_rules! slot_ids {
    ($($slot:literal),* $(,)?) => {
        [$([
            concat!("osc", $slot, "_wave"),
            concat!("osc", $slot, "_on"),
            concat!("osc", $slot, "_octave"),
            concat!("osc", $slot, "_semi"),
            concat!("osc", $slot, "_detune"),
            concat!("osc", $slot, "_gain"),
            concat!("osc", $slot, "_fm_freq"),
            concat!("osc", $slot, "_fm_depth"),
            concat!("osc", $slot, "_attack"),
            concat!("osc", $slot, "_decay"),
            concat!("osc", $slot, "_sustain"),
            concat!("osc", $slot, "_release"),
        ]),*]
    };
}

static STRING_IDS: [[&str; ParamKind::COUNT]; MAX_SLOTS] = slot_ids!(0, 1, 2, 3, 4, 5, 6, 7);

static GROUPS: [&str; MAX_SLOTS] = [
    "Oscillator 1",
    "Oscillator 2",
    "Oscillator 3",
    "Oscillator 4",
    "Oscillator 5",
    "Oscillator 6",
    "Oscillator 7",
    "Oscillator 8",
];

/// Stable ID for `key`: `(slot + 1) * 100 + kind index`.
pub const fn param_id(key: ParamKey) -> ParamId {
    ParamId(((key.oscillator + 1) * 100 + key.kind.index()) as u32)
}

/// Inverse of [`param_id`]. `None` for IDs outside the slot convention.
pub fn key_for_id(id: ParamId) -> Option<ParamKey> {
    let raw = id.0 as usize;
    let slot = (raw / 100).checked_sub(1)?;
    let kind = ParamKind::from_index(raw % 100)?;
    (slot < MAX_SLOTS).then_some(ParamKey::new(slot, kind))
}

/// Range, default and display metadata for one kind, without ID or group.
///
/// `first_slot` decides the enabled default: only the first oscillator
/// starts on, so a fresh patch makes one audible tone.
pub const fn kind_descriptor(kind: ParamKind, first_slot: bool) -> ParamDescriptor {
    match kind {
        ParamKind::Waveform => {
            ParamDescriptor::stepped("Waveform", "Wave", ParamUnit::None, 0.0, 2.0, 0.0)
        }
        ParamKind::Enabled => ParamDescriptor::toggle("Enabled", "On", first_slot),
        ParamKind::Octave => {
            ParamDescriptor::stepped("Octave", "Oct", ParamUnit::Octaves, -4.0, 4.0, 0.0)
        }
        ParamKind::Semitone => {
            ParamDescriptor::stepped("Semitone", "Semi", ParamUnit::Semitones, -12.0, 12.0, 0.0)
        }
        ParamKind::Detune => ParamDescriptor {
            unit: ParamUnit::Cents,
            step: 1.0,
            ..ParamDescriptor::level("Detune", "Detune", -100.0, 100.0, 0.0)
        },
        ParamKind::Gain => ParamDescriptor::level("Gain", "Gain", 0.0, 1.0, 0.5),
        ParamKind::FmFrequency => {
            ParamDescriptor::frequency_hz("FM Frequency", "FM Freq", 0.0, 1000.0, 5.0)
                .with_scale(FM_SCALE)
        }
        ParamKind::FmDepth => {
            ParamDescriptor::frequency_hz("FM Depth", "FM Depth", 0.0, 1000.0, 0.0)
                .with_scale(FM_SCALE)
        }
        ParamKind::Attack => ParamDescriptor::time_s("Attack", "Attack", 0.1, 1.0, 0.1),
        ParamKind::Decay => ParamDescriptor::time_s("Decay", "Decay", 0.1, 1.0, 0.1),
        ParamKind::Sustain => ParamDescriptor::level("Sustain", "Sustain", 0.1, 1.0, 1.0),
        ParamKind::Release => ParamDescriptor::time_s("Release", "Release", 0.1, 3.0, 0.4),
    }
}

/// Full descriptor for `key`, or `None` if the slot exceeds [`MAX_SLOTS`].
pub fn descriptor(key: ParamKey) -> Option<ParamDescriptor> {
    let ids = STRING_IDS.get(key.oscillator)?;
    Some(
        kind_descriptor(key.kind, key.oscillator == 0)
            .with_id(param_id(key), ids[key.kind.index()])
            .with_group(GROUPS[key.oscillator]),
    )
}

/// Descriptors for a fixed number of oscillator slots, in flat-index order.
///
/// # Example
///
/// ```rust
/// use polyosc_params::ParamLayout;
/// use polyosc_synth::{ParamKey, ParamKind};
///
/// let layout = ParamLayout::new(3).unwrap();
/// assert_eq!(layout.len(), 36);
///
/// let attack = layout.by_key(ParamKey::new(1, ParamKind::Attack)).unwrap();
/// assert_eq!(attack.string_id, "osc1_attack");
/// assert_eq!(attack.id.0, 208);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParamLayout {
    slots: usize,
    descriptors: Vec<ParamDescriptor>,
}

impl ParamLayout {
    /// Layout for `slots` oscillator slots.
    ///
    /// # Errors
    ///
    /// [`ParamsError::InvalidSlotCount`] unless `1 <= slots <= MAX_SLOTS`.
    pub fn new(slots: usize) -> Result<Self, ParamsError> {
        if slots == 0 || slots > MAX_SLOTS {
            return Err(ParamsError::InvalidSlotCount {
                count: slots,
                max: MAX_SLOTS,
            });
        }
        let descriptors = (0..slots * ParamKind::COUNT)
            .filter_map(|index| descriptor(ParamKey::from_flat_index(index)))
            .collect();
        Ok(Self { slots, descriptors })
    }

    /// Number of oscillator slots.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Total number of parameters.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Always `false`: a layout has at least one slot.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// All descriptors in flat-index order.
    pub fn descriptors(&self) -> &[ParamDescriptor] {
        &self.descriptors
    }

    /// Descriptor at a flat index.
    pub fn get(&self, index: usize) -> Option<&ParamDescriptor> {
        self.descriptors.get(index)
    }

    /// Descriptor for a slot/kind key.
    pub fn by_key(&self, key: ParamKey) -> Option<&ParamDescriptor> {
        if key.oscillator >= self.slots {
            return None;
        }
        self.descriptors.get(key.flat_index())
    }

    /// Flat index for a stable ID, if the ID belongs to this layout.
    pub fn index_of_id(&self, id: ParamId) -> Option<usize> {
        let key = key_for_id(id)?;
        (key.oscillator < self.slots).then(|| key.flat_index())
    }

    /// Flat index for a string ID such as `"osc2_gain"`.
    pub fn index_of_string_id(&self, string_id: &str) -> Option<usize> {
        self.descriptors
            .iter()
            .position(|d| d.string_id == string_id)
    }
}
