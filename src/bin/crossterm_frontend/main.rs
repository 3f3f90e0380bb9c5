use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use structopt::StructOpt;

use chip_8_vm::emulator::{Config, Emulator, Key, Rom};
use chip_8_vm::util::verbosity;

mod crossterm_io;
mod key_buffer;
mod key_manager;
use crossterm_io::{Bell, CrosstermOutput};
use key_manager::KeyManager;

/// Run a CHIP-8 program in the terminal. Escape quits.
#[derive(StructOpt)]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Instructions per second
    #[structopt(long, default_value = "500")]
    hz: u32,

    /// Seed for the random number instruction
    #[structopt(long)]
    seed: Option<u64>,

    /// Stop on unknown opcodes instead of skipping them
    #[structopt(long)]
    strict: bool,

    /// Verbose mode (-v, -vv, -vvv)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {

    // Get configuration and read input file
    let opt = Opt::from_args();
    env_logger::Builder::from_default_env()
        .filter_level(verbosity::level_filter(opt.verbose))
        .init();
    log::info!("Executing {:?}", &opt.input);
    let rom = Rom::from_path(&opt.input)?;

    let mut config = Config::default();
    if opt.strict {
        config = config.strict();
    }
    if let Some(seed) = opt.seed {
        config = config.with_seed(seed);
    }

    let mut emulator = Emulator::with_config(config, Bell);
    emulator.load_rom(&rom)?;

    let key_manager = KeyManager::new();
    let mut output = CrosstermOutput::new()?;
    let cycle = Duration::from_secs(1) / opt.hz.max(1);

    while !key_manager.quit_requested() {
        for key in Key::all() {
            if key_manager.is_held(key) {
                emulator.set_key(key);
            } else {
                emulator.clear_key(key);
            }
        }

        if let Err(fault) = emulator.step() {
            drop(output);
            log::error!("Stopped at {:#06x}: {}", emulator.program_counter(), fault);
            return Err(fault.into());
        }

        if emulator.take_redraw() {
            output.render(emulator.screen())?;
        }

        thread::sleep(cycle);
    }

    Ok(())
}
