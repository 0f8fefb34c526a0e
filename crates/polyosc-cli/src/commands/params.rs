//! Parameter layout listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use polyosc_params::ParamLayout;
use polyosc_synth::EngineConfig;

#[derive(Args)]
pub struct ParamsArgs {
    /// Number of oscillator slots to list
    #[arg(long, default_value_t = EngineConfig::default().oscillators_per_voice)]
    slots: usize,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let layout = ParamLayout::new(args.slots)?;

    println!("Parameters ({} slots, {} total)", layout.slots(), layout.len());
    println!();
    println!(
        "  {:>4}  {:16}  {:14}  {:>9}  {:>9}  {:>9}",
        "ID", "String ID", "Name", "Min", "Max", "Default"
    );
    println!(
        "  {:>4}  {:16}  {:14}  {:>9}  {:>9}  {:>9}",
        "--", "---------", "----", "---", "---", "-------"
    );

    let mut group = "";
    for desc in layout.descriptors() {
        if desc.group != group {
            group = desc.group;
            println!();
            println!("  [{}]", group);
        }
        let suffix = desc.unit.suffix();
        println!(
            "  {:>4}  {:16}  {:14}  {:>9}  {:>9}  {:>9}",
            desc.id.0,
            desc.string_id,
            desc.name,
            format!("{}{}", desc.min, suffix),
            format!("{}{}", desc.max, suffix),
            format!("{}{}", desc.default, suffix),
        );
    }

    Ok(())
}
