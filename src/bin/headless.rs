use std::error::Error;
use std::path::PathBuf;

use structopt::StructOpt;

use chip_8_vm::emulator::{Config, Emulator, Rom};
use chip_8_vm::util::verbosity;

/// Run a CHIP-8 program without a display and print the final screen.
#[derive(StructOpt)]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Number of cycles to run
    #[structopt(long, default_value = "1000")]
    cycles: usize,

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
    let opt = Opt::from_args();
    pretty_env_logger::formatted_builder()
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

    let mut beeps = 0;
    {
        let mut emulator = Emulator::with_config(config, || beeps += 1);
        emulator.load_rom(&rom)?;

        for cycle in 0..opt.cycles {
            if emulator.is_waiting_for_key() {
                log::info!("Waiting for a key after {} cycles, stopping", cycle);
                break;
            }
            if let Err(fault) = emulator.step() {
                log::error!("Stopped at {:#06x} after {} cycles: {}", emulator.program_counter(), cycle, fault);
                print!("{}", emulator);
                return Err(fault.into());
            }
        }

        print!("{}", emulator);
    }
    log::info!("Beeped {} times", beeps);

    Ok(())
}
