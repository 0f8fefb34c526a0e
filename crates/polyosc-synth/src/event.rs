//! Note events delivered to the engine alongside each render block.

/// Whether a [`NoteEvent`] starts or stops a note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteEventKind {
    /// Start a note.
    On,
    /// Release a note.
    Off,
}

/// A note-on or note-off at a frame offset within the current block.
///
/// Offsets are relative to the start of the block passed to
/// [`Engine::process`](crate::Engine::process). Events in one batch are
/// expected in ascending offset order; an event whose offset lies past the
/// end of the block takes effect right after the block's last frame.
///
/// # Example
///
/// ```rust
/// use polyosc_synth::{NoteEvent, NoteEventKind};
///
/// let on = NoteEvent::note_on(60, 0.8, 0);
/// let off = NoteEvent::note_off(60, 128);
/// assert_eq!(on.kind, NoteEventKind::On);
/// assert_eq!(off.offset, 128);
///
/// // Out-of-range input is clamped
/// assert_eq!(NoteEvent::note_on(200, 3.0, 0).note, 127);
/// assert_eq!(NoteEvent::note_on(200, 3.0, 0).velocity, 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteEvent {
    /// MIDI note number (0 to 127).
    pub note: u8,
    /// Velocity (0.0 to 1.0). Ignored for note-off.
    pub velocity: f32,
    /// Frame offset within the block.
    pub offset: usize,
    /// On or off.
    pub kind: NoteEventKind,
}

impl NoteEvent {
    /// Note-on at `offset`, with note and velocity clamped to their ranges.
    pub fn note_on(note: u8, velocity: f32, offset: usize) -> Self {
        Self {
            note: note.min(127),
            velocity: if velocity.is_nan() {
                0.0
            } else {
                velocity.clamp(0.0, 1.0)
            },
            offset,
            kind: NoteEventKind::On,
        }
    }

    /// Note-off at `offset`.
    pub fn note_off(note: u8, offset: usize) -> Self {
        Self {
            note: note.min(127),
            velocity: 0.0,
            offset,
            kind: NoteEventKind::Off,
        }
    }

    /// Note-on from a 7-bit MIDI velocity (0 to 127).
    pub fn from_midi_note_on(note: u8, velocity: u8, offset: usize) -> Self {
        Self::note_on(note, f32::from(velocity.min(127)) / 127.0, offset)
    }

    /// Same event moved to a different offset.
    pub fn at(self, offset: usize) -> Self {
        Self { offset, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_clamps() {
        let ev = NoteEvent::note_on(130, -0.5, 3);
        assert_eq!(ev.note, 127);
        assert_eq!(ev.velocity, 0.0);
        assert_eq!(ev.offset, 3);
        assert_eq!(NoteEvent::note_on(60, f32::NAN, 0).velocity, 0.0);
    }

    #[test]
    fn test_midi_velocity_scaling() {
        assert_eq!(NoteEvent::from_midi_note_on(60, 127, 0).velocity, 1.0);
        assert_eq!(NoteEvent::from_midi_note_on(60, 0, 0).velocity, 0.0);
        assert_eq!(NoteEvent::from_midi_note_on(60, 255, 0).velocity, 1.0);
    }

    #[test]
    fn test_at_moves_offset() {
        let ev = NoteEvent::note_off(64, 0).at(17);
        assert_eq!(ev.offset, 17);
        assert_eq!(ev.kind, NoteEventKind::Off);
        assert_eq!(ev.note, 64);
    }
}
