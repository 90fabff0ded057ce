use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use itertools::Itertools;

use crate::dump::{Dump, MemoryImage};
use crate::memtype::{FLASH, SIGNATURE};
use crate::tool::Disassembler;

/// Format bytes as a lowercase hex string, e.g. `1e950f`.
pub fn hex(data: &[u8]) -> String {
    data.iter().map(|byte| format!("{:02x}", byte)).join("")
}

/// Format a fuse byte as hex and binary, e.g. `0xff (0b11111111)`.
pub fn fuse_bits(byte: u8) -> String {
    format!("0x{:02x} (0b{:08b})", byte, byte)
}

/// Disassemble the flash image into `asm_path`.
fn disassemble(
    disassembler: &dyn Disassembler,
    flash: &MemoryImage,
    asm_path: &Path,
) -> anyhow::Result<()> {
    let listing = disassembler.disassemble(&flash.path)?;
    fs::write(asm_path, listing)
        .with_context(|| format!("Cannot write disassembly to `{}`", asm_path.display()))
}

/// Write a report of the dumped memory to `out`.
///
/// Each section is best-effort: a missing image or a failing
/// disassembler only affects its own section.
pub fn write_report<W: Write>(
    out: &mut W,
    dump: &Dump,
    disassembler: Option<&dyn Disassembler>,
    asm_path: &Path,
) -> io::Result<()> {
    writeln!(out, "Successfully dumped {}", dump.memtypes().join(", "))?;

    if let Some(flash) = dump.image(FLASH) {
        match disassembler {
            Some(disassembler) => match disassemble(disassembler, flash, asm_path) {
                Ok(()) => writeln!(out, "Flash disassembly: {}", asm_path.display())?,
                Err(err) => log::warn!("Cannot disassemble flash: {:#}", err),
            },
            None => log::warn!("avr-objdump not found on your system, skipping disassembly"),
        }
    }

    if let Some(signature) = dump.image(SIGNATURE) {
        writeln!(out, "Device signature: {}", hex(&signature.data))?;
    }

    for fuse in dump.images.iter().filter(|image| image.memtype.is_fuse()) {
        writeln!(
            out,
            "{}: {}",
            fuse.memtype,
            fuse.data.iter().copied().map(fuse_bits).join(" ")
        )?;
    }

    Ok(())
}
