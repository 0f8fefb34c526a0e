//! Chord demo: three-oscillator patch, staggered chord, voice stealing.
//!
//! Run with: cargo run -p polyosc-synth --example chord_demo

use polyosc_synth::{
    AdsrSettings, Engine, EngineConfig, NoteEvent, OscillatorSettings, ParamSnapshot, Waveform,
};

fn peak(block: &[f32]) -> f32 {
    block.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

fn main() {
    let config = EngineConfig::with_counts(4, 3);
    let mut engine = Engine::new(config).expect("default config is valid");

    // --- Patch: saw + detuned saw + square an octave down with slow FM ---
    let mut patch = ParamSnapshot::new(3);
    patch.oscillators_mut()[0] = OscillatorSettings {
        waveform: Waveform::Saw,
        gain: 0.4,
        ..OscillatorSettings::default()
    };
    patch.oscillators_mut()[1] = OscillatorSettings {
        waveform: Waveform::Saw,
        detune_cents: 7.0,
        gain: 0.4,
        ..OscillatorSettings::default()
    };
    patch.oscillators_mut()[2] = OscillatorSettings {
        waveform: Waveform::Square,
        octave: -1,
        gain: 0.2,
        fm_frequency: 5.0,
        fm_depth: 3.0,
        ..OscillatorSettings::default()
    };
    for env in patch.envelopes_mut() {
        *env = AdsrSettings {
            attack: 0.02,
            decay: 0.2,
            sustain: 0.6,
            release: 0.3,
        };
    }

    println!("=== Staggered C major chord ===\n");
    println!("Block | Active | Peak");
    println!("------+--------+-------");

    let block_size = 512;
    let mut block = vec![0.0f32; block_size];
    let schedule: [&[NoteEvent]; 4] = [
        &[NoteEvent::note_on(60, 0.8, 0)],
        &[NoteEvent::note_on(64, 0.8, 100)],
        &[NoteEvent::note_on(67, 0.8, 200)],
        &[NoteEvent::note_on(72, 0.8, 300)],
    ];
    for (i, events) in schedule.iter().enumerate() {
        engine.process_mono(&patch, &mut block, events);
        println!("{:>5} | {:>6} | {:.4}", i, engine.active_voice_count(), peak(&block));
    }

    // --- A fifth note on a 4-voice engine steals the oldest ---
    println!("\n=== Voice stealing ===\n");
    engine.process_mono(&patch, &mut block, &[NoteEvent::note_on(76, 0.8, 0)]);
    for (i, voice) in engine.pool().voices().iter().enumerate() {
        println!("voice {i}: note {:?} ({:?})", voice.note(), voice.state());
    }
    println!("steals: {}", engine.pool().steal_count());

    // --- Release everything and render the tail ---
    println!("\n=== Release tail ===\n");
    engine.all_notes_off();
    let mut blocks = 0;
    while engine.active_voice_count() > 0 {
        engine.process_mono(&patch, &mut block, &[]);
        blocks += 1;
    }
    println!(
        "silent after {blocks} blocks ({:.0} ms)",
        blocks as f32 * block_size as f32 / config.sample_rate * 1000.0
    );
}
