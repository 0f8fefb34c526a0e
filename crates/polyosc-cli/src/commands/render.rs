//! Offline render command.

use anyhow::Context;
use clap::Args;
use polyosc_params::ParamStore;
use polyosc_synth::{Engine, NoteEvent};
use std::path::PathBuf;

use super::common::{apply_overrides, load_preset, parse_key_val, parse_notes};
use crate::wav::write_wav;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset file (TOML)
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// MIDI notes to play (comma-separated)
    #[arg(short, long, default_value = "60,64,67")]
    notes: String,

    /// Note velocity (0-1)
    #[arg(long, default_value = "0.8")]
    velocity: f32,

    /// Delay between successive note-ons in seconds
    #[arg(long, default_value = "0.0")]
    stagger: f32,

    /// Hold time after the last note-on in seconds
    #[arg(long, default_value = "1.0")]
    hold: f32,

    /// Render time after note-off in seconds
    #[arg(long, default_value = "1.0")]
    tail: f32,

    /// Number of voices (overrides the preset)
    #[arg(long)]
    voices: Option<usize>,

    /// Oscillators per voice (overrides the preset)
    #[arg(long)]
    oscillators: Option<usize>,

    /// Sample rate (overrides the preset)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Block size in samples
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Write two identical channels
    #[arg(long)]
    stereo: bool,

    /// Parameter override, e.g. osc0_wave=1 (repeatable)
    #[arg(long = "set", value_parser = parse_key_val)]
    overrides: Vec<(String, f32)>,
}

/// Note events with absolute frame positions.
fn schedule(notes: &[u8], velocity: f32, stagger: usize, hold: usize) -> Vec<(usize, NoteEvent)> {
    let release_at = stagger * notes.len().saturating_sub(1) + hold;
    let ons = notes
        .iter()
        .enumerate()
        .map(|(i, &note)| (i * stagger, NoteEvent::note_on(note, velocity, 0)));
    let offs = notes
        .iter()
        .map(|&note| (release_at, NoteEvent::note_off(note, 0)));
    ons.chain(offs).collect()
}

fn seconds_to_frames(seconds: f32, sample_rate: u32) -> usize {
    (seconds.max(0.0) * sample_rate as f32).round() as usize
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let notes = parse_notes(&args.notes).map_err(anyhow::Error::msg)?;
    let preset = args.preset.as_deref().map(load_preset).transpose()?;

    let mut config = preset
        .as_ref()
        .and_then(|p| p.engine)
        .unwrap_or_default();
    if let Some(voices) = args.voices {
        config.voice_count = voices;
    }
    if let Some(oscillators) = args.oscillators {
        config.oscillators_per_voice = oscillators;
    }
    if let Some(sample_rate) = args.sample_rate {
        config.sample_rate = sample_rate as f32;
    }
    config.max_block_size = args.block_size;
    let sample_rate = config.sample_rate.round() as u32;

    let mut engine = Engine::new(config).context("invalid engine configuration")?;
    let store = ParamStore::new(config.oscillators_per_voice)
        .context("invalid oscillator count")?;
    if let Some(preset) = &preset {
        preset.apply_to(&store);
        tracing::info!(preset = %preset.name, "preset loaded");
    }
    apply_overrides(&store, &args.overrides)?;

    let stagger = seconds_to_frames(args.stagger, sample_rate);
    let hold = seconds_to_frames(args.hold, sample_rate);
    let events = schedule(&notes, args.velocity, stagger, hold);
    let total =
        events.last().map_or(0, |(frame, _)| *frame) + seconds_to_frames(args.tail, sample_rate);

    tracing::info!(
        notes = notes.len(),
        voices = config.voice_count,
        oscillators = config.oscillators_per_voice,
        sample_rate,
        frames = total,
        "rendering"
    );

    let channel_count = if args.stereo { 2 } else { 1 };
    let mut output: Vec<Vec<f32>> = vec![vec![0.0; total]; channel_count];
    let mut block_events = Vec::with_capacity(events.len());
    let mut next_event = 0;
    let mut start = 0;

    while start < total {
        let end = (start + args.block_size).min(total);

        block_events.clear();
        while let Some(&(frame, event)) = events.get(next_event) {
            if frame >= end {
                break;
            }
            block_events.push(event.at(frame - start));
            next_event += 1;
        }

        let mut channels: Vec<&mut [f32]> = output
            .iter_mut()
            .map(|channel| &mut channel[start..end])
            .collect();
        engine.process(&store, &mut channels, &block_events);
        start = end;
    }

    let peak = output
        .first()
        .map_or(0.0, |ch| ch.iter().fold(0.0_f32, |m, s| m.max(s.abs())));
    let peak_db = if peak > 0.0 {
        20.0 * peak.log10()
    } else {
        f32::NEG_INFINITY
    };
    if peak > 1.0 {
        tracing::warn!(peak, "output clips; lower gains or velocity");
    }

    write_wav(&args.output, &output, sample_rate)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Rendered {} frames ({:.2} s, {} ch) to {}",
        total,
        total as f32 / sample_rate as f32,
        channel_count,
        args.output.display()
    );
    println!("Peak: {:.4} ({:.1} dBFS)", peak, peak_db);
    println!("Voice steals: {}", engine.pool().steal_count());

    Ok(())
}
