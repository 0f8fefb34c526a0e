//! Polyosc CLI - offline renderer for the polyosc synth engine.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polyosc")]
#[command(author, version, about = "Polyosc synth engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render notes through the engine to a WAV file
    Render(commands::render::RenderArgs),

    /// List the parameter layout
    Params(commands::params::ParamsArgs),

    /// Write a default preset as TOML
    Preset(commands::preset::PresetArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Preset(args) => commands::preset::run(args),
    }
}
