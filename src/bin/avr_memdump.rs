use std::io;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context};
use avr_memdump::dump::dump;
use avr_memdump::memtype::MemType;
use avr_memdump::probe::probe;
use avr_memdump::profile::{DeviceProfile, DEFAULT_PROGRAMMER};
use avr_memdump::report::write_report;
use avr_memdump::tool::{AvrObjdump, Avrdude, Disassembler};
use itertools::Itertools;
use log::LevelFilter;

fn init_logging(verbose: u32) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Disassembly output path. Relative paths are taken relative to the
/// dump directory, so the listing ends up next to `flash.bin`.
fn asm_path(dir: &Path, asm: Option<PathBuf>) -> PathBuf {
    dir.join(asm.unwrap_or_else(|| PathBuf::from("disas.s")))
}

fn main() -> anyhow::Result<()> {
    let flags = xflags::parse_or_exit!(
        /// Microcontroller type, see the avrdude man page (e.g. `m328p` for an Uno).
        required -m,--mcu mcu: String
        /// Port the board is connected to (e.g. `/dev/ttyUSB0`).
        required -p,--port port: String
        /// Programmer used to program the board (default: `arduino`).
        optional --prog programmer: String
        /// Directory to dump the memory into, must exist (default: current directory).
        optional -d,--dir dir: PathBuf
        /// File to write the disassembled flash memory to, relative to the dump directory (default: `disas.s`).
        optional --asm asm: PathBuf
        /// Print more output, can be repeated.
        repeated -v,--verbose
    );

    init_logging(flags.verbose);

    let avrdude = Avrdude::locate()?;

    let dir = flags.dir.unwrap_or_else(|| PathBuf::from("."));
    ensure!(
        dir.is_dir(),
        "Output directory `{}` does not exist",
        dir.display()
    );
    let asm_path = asm_path(&dir, flags.asm);

    let mut profile = DeviceProfile::new(
        flags.mcu,
        flags.port,
        flags.prog.as_deref().unwrap_or(DEFAULT_PROGRAMMER),
    );

    eprintln!("Probing supported memory types using avrdude...");
    probe(&avrdude, &mut profile, MemType::candidates())?;
    log::debug!("Supported: {}", profile.memtypes.iter().join(", "));

    eprintln!("Dumping to `{}`...", dir.display());
    let dump = dump(&avrdude, &profile, &dir)?;

    let objdump = match AvrObjdump::locate() {
        Ok(objdump) => Some(objdump),
        Err(err) => {
            log::debug!("{:#}", err);
            None
        }
    };

    write_report(
        &mut io::stdout().lock(),
        &dump,
        objdump.as_ref().map(|objdump| objdump as &dyn Disassembler),
        &asm_path,
    )
    .context("Cannot write report")?;

    Ok(())
}
