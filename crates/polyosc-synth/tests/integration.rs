//! Integration tests for polyosc-synth.
//!
//! Tests cover note lifecycle timing, envelope continuity, voice stealing,
//! tuning, per-oscillator enable, block timing and silence guarantees.

use polyosc_synth::{
    AdsrEnvelope, AdsrSettings, Engine, EngineConfig, EnvelopeState, NoteEvent, OscillatorSettings,
    ParamKey, ParamKind, ParamSnapshot, ParamSource, VoiceState, Waveform, midi_to_freq,
};

const SR: f32 = 48000.0;

fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> AdsrSettings {
    AdsrSettings {
        attack,
        decay,
        sustain,
        release,
    }
}

/// Patch with `slots` identical enabled oscillators.
fn patch(slots: usize, waveform: Waveform, env: AdsrSettings) -> ParamSnapshot {
    let mut patch = ParamSnapshot::new(slots);
    for osc in patch.oscillators_mut() {
        *osc = OscillatorSettings {
            waveform,
            gain: 0.5,
            ..OscillatorSettings::default()
        };
    }
    for e in patch.envelopes_mut() {
        *e = env;
    }
    patch
}

fn engine(voices: usize, oscillators: usize) -> Engine {
    Engine::new(EngineConfig {
        voice_count: voices,
        oscillators_per_voice: oscillators,
        sample_rate: SR,
        max_block_size: 256,
    })
    .unwrap()
}

/// Render `frames` samples in 256-frame blocks, events applied in the first block.
fn render(engine: &mut Engine, patch: &ParamSnapshot, frames: usize, events: &[NoteEvent]) -> Vec<f32> {
    let mut out = vec![0.0_f32; frames];
    let mut first = true;
    for block in out.chunks_mut(256) {
        let evs: &[NoteEvent] = if first { events } else { &[] };
        engine.process_mono(patch, block, evs);
        first = false;
    }
    out
}

// ---------------------------------------------------------------------------
// 1. Note lifecycle timing
// ---------------------------------------------------------------------------

#[test]
fn note_off_reaches_silence_within_release_time() {
    let release = 0.1;
    let release_samples = (release * SR) as usize;
    let patch = patch(2, Waveform::Saw, adsr(0.005, 0.01, 0.7, release));
    let mut engine = engine(4, 2);

    render(&mut engine, &patch, 4800, &[NoteEvent::note_on(57, 1.0, 0)]);
    let tail = render(&mut engine, &patch, release_samples + 2000, &[NoteEvent::note_off(57, 0)]);

    let last_audible = tail.iter().rposition(|&s| s != 0.0).unwrap();
    assert!(
        last_audible <= release_samples + 1,
        "audible until frame {last_audible}, release is {release_samples} frames"
    );
    assert!(
        last_audible > release_samples - 200,
        "release ended too early at frame {last_audible}"
    );
    assert_eq!(engine.active_voice_count(), 0);
}

#[test]
fn held_note_keeps_sounding() {
    let patch = patch(1, Waveform::Square, adsr(0.001, 0.01, 0.5, 0.05));
    let mut engine = engine(2, 1);
    let out = render(&mut engine, &patch, 48000, &[NoteEvent::note_on(60, 1.0, 0)]);
    assert!(out[47000..].iter().any(|&s| s.abs() > 0.1));
    assert_eq!(engine.pool().voice(0).unwrap().state(), VoiceState::Playing);
}

// ---------------------------------------------------------------------------
// 2. Envelope continuity
// ---------------------------------------------------------------------------

#[test]
fn envelope_is_continuous_under_retrigger_during_release() {
    let settings = adsr(0.01, 0.05, 0.6, 0.3);
    let mut env = AdsrEnvelope::new(SR);
    env.set_adsr(&settings);
    let max_step = 1.0 / (settings.attack * SR);

    env.gate_on();
    let mut prev = 0.0;
    for i in 0..20000 {
        if i == 8000 {
            env.gate_off();
        }
        if i == 12000 {
            env.gate_on();
        }
        let level = env.advance();
        assert!(
            (level - prev).abs() <= max_step + 1e-5,
            "jump of {} at sample {i}",
            (level - prev).abs()
        );
        prev = level;
    }
    assert_eq!(env.state(), EnvelopeState::Sustain);
}

#[test]
fn stolen_voice_envelope_does_not_jump() {
    let patch = patch(1, Waveform::Sine, adsr(0.01, 0.01, 1.0, 0.5));
    let mut engine = engine(1, 1);
    render(&mut engine, &patch, 2048, &[NoteEvent::note_on(60, 1.0, 0)]);
    render(&mut engine, &patch, 1024, &[NoteEvent::note_off(60, 0)]);

    let before = engine.pool().voice(0).unwrap().oscillators()[0].envelope().level();
    assert!(before > 0.0 && before < 1.0);
    engine.note_on(64, 1.0);
    let after = engine.pool().voice(0).unwrap().oscillators()[0].envelope().level();
    assert_eq!(before, after);
    assert_eq!(engine.pool().steal_count(), 1);
}

// ---------------------------------------------------------------------------
// 3. Voice stealing
// ---------------------------------------------------------------------------

#[test]
fn one_extra_note_steals_exactly_one_voice() {
    let attack = 0.01;
    let patch = patch(1, Waveform::Saw, adsr(attack, 0.01, 0.8, 0.2));
    let mut engine = engine(4, 1);

    let events: Vec<NoteEvent> = [60, 62, 64, 65]
        .iter()
        .enumerate()
        .map(|(i, &n)| NoteEvent::note_on(n, 1.0, i * 10))
        .collect();
    render(&mut engine, &patch, 256, &events);
    assert_eq!(engine.pool().steal_count(), 0);

    render(&mut engine, &patch, 256, &[NoteEvent::note_on(67, 1.0, 0)]);
    assert_eq!(engine.pool().steal_count(), 1);

    let notes: Vec<Option<u8>> = engine.pool().voices().iter().map(|v| v.note()).collect();
    assert!(!notes.contains(&Some(60)), "oldest note should be stolen: {notes:?}");
    assert!(notes.contains(&Some(67)));
    assert_eq!(notes.iter().filter(|n| n.is_some()).count(), 4);
}

#[test]
fn stealing_prefers_oldest_release_over_oldest_note() {
    let patch = patch(1, Waveform::Saw, adsr(0.01, 0.01, 0.8, 1.0));
    let mut engine = engine(3, 1);
    render(
        &mut engine,
        &patch,
        256,
        &[
            NoteEvent::note_on(60, 1.0, 0),
            NoteEvent::note_on(64, 1.0, 0),
            NoteEvent::note_on(67, 1.0, 0),
            NoteEvent::note_off(67, 100),
            NoteEvent::note_off(64, 200),
        ],
    );
    let stolen = engine.note_on(72, 1.0);
    assert_eq!(engine.pool().voice(stolen).unwrap().note(), Some(72));
    assert_eq!(stolen, 2, "voice released first (note 67) should be taken");
    assert_eq!(
        engine.pool().voice(0).unwrap().note(),
        Some(60),
        "held oldest note survives"
    );
}

#[test]
fn stolen_voice_is_audible_within_one_attack() {
    let attack = 0.01;
    let attack_samples = (attack * SR) as usize;
    let patch = patch(1, Waveform::Sine, adsr(attack, 0.05, 0.5, 0.5));
    let mut engine = engine(1, 1);

    render(&mut engine, &patch, 4800, &[NoteEvent::note_on(60, 1.0, 0)]);
    let out = render(&mut engine, &patch, attack_samples + 1, &[NoteEvent::note_on(72, 1.0, 0)]);

    let voice = engine.pool().voice(0).unwrap();
    assert_eq!(voice.note(), Some(72));
    assert!((voice.base_frequency() - midi_to_freq(72)).abs() < 1e-3);
    assert_eq!(voice.oscillators()[0].envelope().state(), EnvelopeState::Decay);
    let peak = out.iter().fold(0.0_f32, |m, s| m.max(s.abs()));
    assert!(peak > 0.4, "new note should be audible, peak {peak}");
}

#[test]
fn same_pitch_twice_keeps_one_held_voice() {
    let patch = patch(1, Waveform::Sine, adsr(0.01, 0.01, 0.8, 0.2));
    let mut engine = engine(4, 1);
    render(
        &mut engine,
        &patch,
        256,
        &[NoteEvent::note_on(60, 1.0, 0), NoteEvent::note_on(60, 0.5, 100)],
    );
    let held = engine
        .pool()
        .voices()
        .iter()
        .filter(|v| v.is_held() && v.note() == Some(60))
        .count();
    assert_eq!(held, 1);
    assert_eq!(engine.active_voice_count(), 1);
}

// ---------------------------------------------------------------------------
// 4. Tuning
// ---------------------------------------------------------------------------

#[test]
fn effective_frequency_combines_octave_semitone_and_cents() {
    let mut patch = patch(1, Waveform::Sine, AdsrSettings::default());
    patch.oscillators_mut()[0].octave = 2;
    patch.oscillators_mut()[0].semitone = -5;
    patch.oscillators_mut()[0].detune_cents = 50.0;

    let mut engine = engine(1, 1);
    render(&mut engine, &patch, 16, &[NoteEvent::note_on(69, 1.0, 0)]);

    let expected = 440.0 * 4.0 * 2f32.powf(-5.0 / 12.0) * 2f32.powf(50.0 / 1200.0);
    let osc = &engine.pool().voice(0).unwrap().oscillators()[0];
    let actual = osc.effective_frequency(engine.pool().voice(0).unwrap().base_frequency());
    assert!(
        (actual - expected).abs() / expected < 1e-5,
        "expected {expected} Hz, got {actual} Hz"
    );
}

#[test]
fn rendered_pitch_follows_octave_offset() {
    let mut patch = patch(1, Waveform::Sine, adsr(0.0005, 0.0005, 1.0, 0.1));
    patch.oscillators_mut()[0].octave = 1;
    let mut engine = engine(1, 1);
    // A3 one octave up = 440 Hz
    let out = render(&mut engine, &patch, 48000, &[NoteEvent::note_on(57, 1.0, 0)]);

    let crossings = out
        .windows(2)
        .filter(|w| w[0] <= 0.0 && w[1] > 0.0)
        .count() as i32;
    assert!((crossings - 440).abs() <= 2, "got {crossings} cycles");
}

// ---------------------------------------------------------------------------
// 5. Per-oscillator enable
// ---------------------------------------------------------------------------

#[test]
fn disabling_one_oscillator_removes_exactly_its_contribution() {
    let env = adsr(0.005, 0.01, 0.8, 0.2);
    let mut both = patch(2, Waveform::Saw, env);
    both.oscillators_mut()[1].waveform = Waveform::Square;
    both.oscillators_mut()[1].semitone = 7;
    let mut only_first = both.clone();
    only_first.oscillators_mut()[1].enabled = false;

    let mut a = engine(2, 2);
    let mut b = engine(2, 2);
    let on = [NoteEvent::note_on(60, 1.0, 0)];
    let a_sustain = render(&mut a, &both, 4096, &on);
    let b_sustain = render(&mut b, &only_first, 4096, &on);
    assert_ne!(a_sustain, b_sustain, "second oscillator should be audible");

    // Disable mid-sustain in `a`; from now on both engines must match exactly
    let a_after = render(&mut a, &only_first, 4096, &[]);
    let b_after = render(&mut b, &only_first, 4096, &[]);
    assert_eq!(a_after, b_after);
    assert!(a_after.iter().any(|&s| s != 0.0));
}

// ---------------------------------------------------------------------------
// 6. Block timing and silence
// ---------------------------------------------------------------------------

#[test]
fn zero_length_render_changes_nothing() {
    let patch = patch(2, Waveform::Saw, adsr(0.05, 0.05, 0.5, 0.2));
    let mut engine = engine(2, 2);
    render(&mut engine, &patch, 300, &[NoteEvent::note_on(60, 1.0, 0)]);

    let levels_before: Vec<f32> = engine.pool().voices()[0]
        .oscillators()
        .iter()
        .map(|o| o.envelope().level())
        .collect();
    let phase_before = engine.pool().voices()[0].oscillators()[0].phase();

    let mut empty: [f32; 0] = [];
    engine.process_mono(&patch, &mut empty, &[NoteEvent::note_on(72, 1.0, 0)]);
    engine.process(&patch, &mut [&mut empty[..]], &[NoteEvent::note_off(60, 0)]);

    let levels_after: Vec<f32> = engine.pool().voices()[0]
        .oscillators()
        .iter()
        .map(|o| o.envelope().level())
        .collect();
    assert_eq!(levels_before, levels_after);
    assert_eq!(engine.pool().voices()[0].oscillators()[0].phase(), phase_before);
    assert_eq!(engine.active_voice_count(), 1);
    assert_eq!(engine.pool().voices()[0].state(), VoiceState::Playing);
}

#[test]
fn idle_engine_renders_silence_deterministically() {
    let patch = patch(3, Waveform::Square, AdsrSettings::default());
    let mut engine = engine(8, 3);
    for _ in 0..10 {
        let mut left = vec![0.3_f32; 512];
        let mut right = vec![-0.3_f32; 512];
        engine.process(&patch, &mut [&mut left[..], &mut right[..]], &[]);
        assert!(left.iter().all(|&s| s == 0.0));
        assert!(right.iter().all(|&s| s == 0.0));
    }
}

#[test]
fn note_on_offset_leaves_earlier_frames_silent() {
    let patch = patch(1, Waveform::Saw, adsr(0.001, 0.01, 0.8, 0.1));
    let mut engine = engine(2, 1);
    let mut block = vec![0.0_f32; 256];
    engine.process_mono(&patch, &mut block, &[NoteEvent::note_on(60, 1.0, 100)]);
    assert!(block[..100].iter().all(|&s| s == 0.0));
    assert!(block[100..].iter().any(|&s| s != 0.0));
}

#[test]
fn note_off_offset_starts_release_mid_block() {
    let patch = patch(1, Waveform::Square, adsr(0.0005, 0.0005, 1.0, 0.001));
    let mut engine = engine(1, 1);
    render(&mut engine, &patch, 512, &[NoteEvent::note_on(60, 1.0, 0)]);

    let mut block = vec![0.0_f32; 256];
    engine.process_mono(&patch, &mut block, &[NoteEvent::note_off(60, 128)]);
    assert!(block[..128].iter().any(|&s| s != 0.0));
    // 1 ms release = 48 frames
    assert!(block[128 + 50..].iter().all(|&s| s == 0.0));
}

#[test]
fn rendering_is_deterministic() {
    let patch = patch(3, Waveform::Saw, adsr(0.01, 0.1, 0.6, 0.2));
    let events = [
        NoteEvent::note_on(48, 0.9, 0),
        NoteEvent::note_on(55, 0.7, 33),
        NoteEvent::note_on(64, 0.5, 190),
    ];
    let mut a = engine(4, 3);
    let mut b = engine(4, 3);
    assert_eq!(
        render(&mut a, &patch, 4096, &events),
        render(&mut b, &patch, 4096, &events)
    );
}

#[test]
fn host_blocks_longer_than_max_block_size() {
    let patch = patch(1, Waveform::Sine, adsr(0.01, 0.01, 1.0, 0.1));
    let mut small = engine(2, 1);
    let mut large = engine(2, 1);
    large.prepare(SR, 4096).unwrap();

    let mut a = vec![0.0_f32; 2000];
    let mut b = vec![0.0_f32; 2000];
    let on = [NoteEvent::note_on(60, 1.0, 700)];
    small.process_mono(&patch, &mut a, &on);
    large.process_mono(&patch, &mut b, &on);
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// 7. Parameter source
// ---------------------------------------------------------------------------

/// Source that only describes a gain change on slot 0.
struct QuietFirstSlot(ParamSnapshot);

impl ParamSource for QuietFirstSlot {
    fn oscillator_count(&self) -> usize {
        self.0.oscillator_count()
    }

    fn value(&self, key: ParamKey) -> f32 {
        if key == ParamKey::new(0, ParamKind::Gain) {
            0.0
        } else {
            self.0.value(key)
        }
    }
}

#[test]
fn custom_param_source_is_read_every_block() {
    let base = patch(1, Waveform::Saw, adsr(0.001, 0.01, 1.0, 0.1));
    let mut engine = engine(1, 1);
    let loud = render(&mut engine, &base, 512, &[NoteEvent::note_on(60, 1.0, 0)]);
    assert!(loud.iter().any(|&s| s != 0.0));

    let quiet_source = QuietFirstSlot(base);
    let mut block = vec![0.0_f32; 256];
    engine.process_mono(&quiet_source, &mut block, &[]);
    assert!(block.iter().all(|&s| s == 0.0));
    assert_eq!(engine.applier().snapshot().oscillators()[0].gain, 0.0);
}
