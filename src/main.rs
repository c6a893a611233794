mod bus;
mod cpu6502;
mod instructions;
mod rom;
mod trace;

use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::bus::Bus;
use crate::cpu6502::new_cpu;
use crate::rom::Rom;
use crate::trace::trace;

/// Cycle-accurate 6502 interpreter for NROM cartridge images.
#[derive(Parser)]
struct Args {
    /// NES cartridge file path
    file: PathBuf,

    /// Print a Nintendulator-compatible trace line per retired instruction
    #[arg(long)]
    nestest: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(message) = run(&args) {
        eprintln!("{}", message);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    let rom_data = std::fs::read(&args.file)
        .map_err(|e| format!("Failed to read {}: {}", args.file.display(), e))?;
    let rom = Rom::parse_nes_rom(rom_data)?;
    rom.check_validity()?;

    let mut cpu = new_cpu(Bus::new(rom));
    cpu.reset();

    if args.nestest {
        // The nestest reference log runs the ROM's automated mode, which
        // starts at $C000 instead of going through the reset vector
        cpu.program_counter = 0xC000;
        cpu.run_with_callback(|cpu| println!("{}", trace(cpu)));
    } else {
        cpu.run_with_callback(|cpu| println!("{}", cpu));
    }
    Ok(())
}
