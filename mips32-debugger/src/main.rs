use crate::console::{ConsoleIoDevice, StdioFileHandler};
use crate::debugger::{parse_address, Debugger};
use mips32_core::config::Config;
use mips32_core::Machine;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod console;
mod debugger;
mod demo;
mod plotter;

#[derive(StructOpt)]
struct CliArgs {
    /// Resident RAM budget in MiB
    #[structopt(long, default_value = "512")]
    ram_mib: u64,

    /// Entry address for the loaded image (hex with 0x prefix, or decimal)
    #[structopt(long, default_value = "0x80000000", parse(try_from_str = parse_address))]
    entry: u32,

    /// Raw little-endian program image; the built-in demo is loaded if
    /// this is omitted
    #[structopt(parse(from_os_str))]
    image: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Setup logging and parse CLI args
    env_logger::init();
    let args = CliArgs::from_args();

    let mut io = ConsoleIoDevice::new();
    let mut files = StdioFileHandler::new();

    let mut machine = Machine::new(
        Config {
            ram_budget_bytes: args.ram_mib * 1024 * 1024,
            boot_address: args.entry,
        },
        &mut io,
        &mut files,
    );
    machine.reset();

    match &args.image {
        Some(path) => {
            let data = fs::read(path)?;
            machine.inspector().write_ram(args.entry, &data)?;
            info!("Loaded {} bytes at 0x{:08x}", data.len(), args.entry);
        }
        None => {
            let entry = demo::load(&mut machine)?;
            info!("Loaded built-in demo at 0x{:08x}", entry);
        }
    }

    let mut debugger = Debugger::new(machine);
    debugger.run()?;

    Ok(())
}
