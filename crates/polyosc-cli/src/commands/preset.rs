//! Default preset export command.

use anyhow::Context;
use clap::Args;
use polyosc_params::{ParamStore, Preset};
use polyosc_synth::EngineConfig;
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetArgs {
    /// Output TOML file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name
    #[arg(long, default_value = "Init")]
    name: String,

    /// Number of voices to record in the [engine] table
    #[arg(long, default_value_t = EngineConfig::default().voice_count)]
    voices: usize,

    /// Number of oscillator slots
    #[arg(long, default_value_t = EngineConfig::default().oscillators_per_voice)]
    slots: usize,
}

pub fn run(args: PresetArgs) -> anyhow::Result<()> {
    let store = ParamStore::new(args.slots)?;
    let preset = Preset::from_store(args.name, &store)
        .with_description("Default patch")
        .with_engine(EngineConfig::with_counts(args.voices, args.slots));

    preset
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    tracing::info!(path = %args.output.display(), slots = args.slots, "preset written");
    println!("Wrote preset '{}' to {}", preset.name, args.output.display());
    Ok(())
}
