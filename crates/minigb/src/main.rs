mod rom;

use anyhow::{Context, Result};
use minigb_core::Machine;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!(
                "No ROM path provided.\n\
                 Usage: minigb <rom-path> [max-steps]"
            );
            std::process::exit(1);
        }
    };
    let max_steps = match args.next() {
        Some(raw) => Some(
            raw.parse::<u64>()
                .with_context(|| format!("max-steps must be an integer, got '{raw}'"))?,
        ),
        None => None,
    };

    let data =
        std::fs::read(&path).with_context(|| format!("failed to read ROM file '{path}'"))?;
    let image = rom::RomImage::parse(data)
        .with_context(|| format!("'{path}' is not a valid cartridge image"))?;

    log::info!("Title: {}", image.title());
    log::info!("ROM size: {} bytes", image.len());

    let mut machine = Machine::new(image.into_bytes());
    match max_steps {
        Some(limit) => {
            let executed = machine
                .run_steps(limit)
                .context("emulation stopped on a fatal condition")?;
            log::info!(
                "executed {executed} instructions ({cycles} cycles)",
                cycles = machine.cpu.cycles()
            );
        }
        None => {
            machine
                .run()
                .context("emulation stopped on a fatal condition")?;
            log::info!(
                "halted normally after {cycles} cycles",
                cycles = machine.cpu.cycles()
            );
        }
    }

    Ok(())
}
