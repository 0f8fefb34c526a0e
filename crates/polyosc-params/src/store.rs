//! Lock-free parameter storage shared between control and audio threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use polyosc_core::{ParamDescriptor, ParamId};
use polyosc_synth::{ParamKey, ParamSource};

use crate::error::ParamsError;
use crate::layout::ParamLayout;

/// Atomic parameter values for one [`ParamLayout`].
///
/// Values are f32 bit patterns in `AtomicU32`s, stored in plain units
/// (seconds, Hz, cents). Clones share the same storage: hand one clone to
/// the UI or host thread and another to the audio callback. Writers never
/// block; the engine reads each value once per block through
/// [`ParamSource`].
///
/// Every setter clamps to the descriptor range, so the audio thread only
/// ever sees in-range values.
///
/// # Example
///
/// ```rust
/// use polyosc_params::ParamStore;
/// use polyosc_synth::{ParamKey, ParamKind};
///
/// let store = ParamStore::new(3).unwrap();
/// let ui = store.clone();
///
/// ui.set(ParamKey::new(0, ParamKind::Release), 10.0);
/// assert_eq!(store.get(ParamKey::new(0, ParamKind::Release)), 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct ParamStore {
    layout: Arc<ParamLayout>,
    values: Arc<[AtomicU32]>,
}

impl ParamStore {
    /// Store for `slots` oscillator slots, initialized to defaults.
    ///
    /// # Errors
    ///
    /// [`ParamsError::InvalidSlotCount`] for an unsupported slot count.
    pub fn new(slots: usize) -> Result<Self, ParamsError> {
        Ok(Self::from_layout(ParamLayout::new(slots)?))
    }

    /// Store over an existing layout, initialized to defaults.
    pub fn from_layout(layout: ParamLayout) -> Self {
        let values = layout
            .descriptors()
            .iter()
            .map(|d| AtomicU32::new(d.default.to_bits()))
            .collect();
        Self {
            layout: Arc::new(layout),
            values,
        }
    }

    /// The parameter layout.
    pub fn layout(&self) -> &ParamLayout {
        &self.layout
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if the store holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Descriptor at a flat index.
    pub fn descriptor(&self, index: usize) -> Option<&ParamDescriptor> {
        self.layout.get(index)
    }

    /// Value at a flat index, or `None` if out of range.
    pub fn get_index(&self, index: usize) -> Option<f32> {
        self.values
            .get(index)
            .map(|v| f32::from_bits(v.load(Ordering::Acquire)))
    }

    /// Set the value at a flat index, clamped to its range.
    ///
    /// Returns the stored value, or `None` if the index is out of range.
    pub fn set_index(&self, index: usize, value: f32) -> Option<f32> {
        let (atomic, desc) = self.values.get(index).zip(self.layout.get(index))?;
        let clamped = desc.clamp(value);
        atomic.store(clamped.to_bits(), Ordering::Release);
        Some(clamped)
    }

    /// Value for a slot/kind key. Keys outside the layout read as `0.0`.
    pub fn get(&self, key: ParamKey) -> f32 {
        if key.oscillator >= self.layout.slots() {
            return 0.0;
        }
        self.get_index(key.flat_index()).unwrap_or(0.0)
    }

    /// Set a slot/kind key, clamped. Keys outside the layout are ignored.
    pub fn set(&self, key: ParamKey, value: f32) {
        if key.oscillator < self.layout.slots() {
            self.set_index(key.flat_index(), value);
        }
    }

    /// Value for a stable ID.
    pub fn get_by_id(&self, id: ParamId) -> Option<f32> {
        self.get_index(self.layout.index_of_id(id)?)
    }

    /// Set by stable ID, clamped. Returns `false` for unknown IDs.
    pub fn set_by_id(&self, id: ParamId, value: f32) -> bool {
        self.layout
            .index_of_id(id)
            .and_then(|index| self.set_index(index, value))
            .is_some()
    }

    /// Normalized (0–1) value at a flat index, using the descriptor's scale.
    pub fn get_normalized(&self, index: usize) -> Option<f32> {
        let desc = self.layout.get(index)?;
        Some(desc.normalize(self.get_index(index)?))
    }

    /// Set from a normalized (0–1) value at a flat index.
    pub fn set_normalized(&self, index: usize, normalized: f32) -> Option<f32> {
        let desc = self.layout.get(index)?;
        self.set_index(index, desc.denormalize(normalized))
    }

    /// Restore every parameter to its default.
    pub fn reset_to_defaults(&self) {
        for (atomic, desc) in self.values.iter().zip(self.layout.descriptors()) {
            atomic.store(desc.default.to_bits(), Ordering::Release);
        }
    }

    /// Copy of all current values in flat-index order.
    pub fn values(&self) -> Vec<f32> {
        (0..self.len()).filter_map(|i| self.get_index(i)).collect()
    }
}

impl ParamSource for ParamStore {
    fn oscillator_count(&self) -> usize {
        self.layout.slots()
    }

    fn value(&self, key: ParamKey) -> f32 {
        self.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyosc_synth::{ParamKind, ParamSnapshot, Waveform};

    #[test]
    fn test_defaults() {
        let store = ParamStore::new(2).unwrap();
        assert_eq!(store.len(), 24);
        assert_eq!(store.get(ParamKey::new(0, ParamKind::Gain)), 0.5);
        assert_eq!(store.get(ParamKey::new(0, ParamKind::Enabled)), 1.0);
        assert_eq!(store.get(ParamKey::new(1, ParamKind::Enabled)), 0.0);
        assert_eq!(store.get(ParamKey::new(1, ParamKind::Release)), 0.4);
    }

    #[test]
    fn test_set_clamps() {
        let store = ParamStore::new(1).unwrap();
        store.set(ParamKey::new(0, ParamKind::Octave), 9.0);
        assert_eq!(store.get(ParamKey::new(0, ParamKind::Octave)), 4.0);
        store.set(ParamKey::new(0, ParamKind::Detune), -500.0);
        assert_eq!(store.get(ParamKey::new(0, ParamKind::Detune)), -100.0);
        store.set(ParamKey::new(0, ParamKind::Gain), f32::NAN);
        assert_eq!(store.get(ParamKey::new(0, ParamKind::Gain)), 0.5);
    }

    #[test]
    fn test_clones_share_storage() {
        let store = ParamStore::new(1).unwrap();
        let other = store.clone();
        other.set(ParamKey::new(0, ParamKind::Attack), 0.5);
        assert_eq!(store.get(ParamKey::new(0, ParamKind::Attack)), 0.5);
    }

    #[test]
    fn test_out_of_layout_keys() {
        let store = ParamStore::new(1).unwrap();
        store.set(ParamKey::new(3, ParamKind::Gain), 1.0);
        assert_eq!(store.get(ParamKey::new(3, ParamKind::Gain)), 0.0);
        assert_eq!(store.get_index(500), None);
        assert_eq!(store.set_index(500, 1.0), None);
    }

    #[test]
    fn test_by_id() {
        let store = ParamStore::new(2).unwrap();
        assert!(store.set_by_id(ParamId(205), 0.25));
        assert_eq!(store.get(ParamKey::new(1, ParamKind::Gain)), 0.25);
        assert_eq!(store.get_by_id(ParamId(205)), Some(0.25));
        assert!(!store.set_by_id(ParamId(305), 0.25));
        assert_eq!(store.get_by_id(ParamId(42)), None);
    }

    #[test]
    fn test_normalized_access() {
        let store = ParamStore::new(1).unwrap();
        let gain = ParamKey::new(0, ParamKind::Gain).flat_index();
        store.set_normalized(gain, 0.25);
        assert!((store.get_index(gain).unwrap() - 0.25).abs() < 1e-6);

        let fm = ParamKey::new(0, ParamKind::FmDepth).flat_index();
        store.set_normalized(fm, 1.0);
        assert!((store.get_index(fm).unwrap() - 1000.0).abs() < 1e-2);
        assert!((store.get_normalized(fm).unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_reset_to_defaults() {
        let store = ParamStore::new(1).unwrap();
        store.set(ParamKey::new(0, ParamKind::Sustain), 0.2);
        store.reset_to_defaults();
        assert_eq!(store.get(ParamKey::new(0, ParamKind::Sustain)), 1.0);
    }

    #[test]
    fn test_capture_into_snapshot() {
        let store = ParamStore::new(2).unwrap();
        store.set(ParamKey::new(1, ParamKind::Waveform), 2.0);
        store.set(ParamKey::new(1, ParamKind::Enabled), 1.0);
        store.set(ParamKey::new(1, ParamKind::Semitone), 7.0);

        let mut snapshot = ParamSnapshot::new(2);
        snapshot.capture(&store);
        assert!(snapshot.oscillators()[0].enabled);
        assert_eq!(snapshot.oscillators()[1].waveform, Waveform::Square);
        assert_eq!(snapshot.oscillators()[1].semitone, 7);
        assert_eq!(snapshot.envelopes()[1].release, 0.4);
    }
}
