//! External tools that do the actual work.
//!
//! Both tools are abstracted behind a trait, so that probing and
//! reporting can be exercised without a device or an AVR toolchain.

use std::path::{Path, PathBuf};

use anyhow::Context;
use xshell::{cmd, Shell};

use crate::memtype::MemType;
use crate::profile::DeviceProfile;

/// Reads device memory.
pub trait Programmer {
    /// Read `memtype` from the device into `dir/<memtype>.bin`.
    ///
    /// Returns an error if the programmer could not be launched or
    /// exited unsuccessfully. Either way the memory type should be
    /// considered unsupported.
    fn read(&self, profile: &DeviceProfile, memtype: &MemType, dir: &Path) -> anyhow::Result<()>;
}

/// Disassembles a raw flash image.
pub trait Disassembler {
    /// Disassemble the image at `image`, returning the listing.
    fn disassemble(&self, image: &Path) -> anyhow::Result<Vec<u8>>;
}

/// Find `name` in `PATH`.
fn locate(name: &str) -> anyhow::Result<PathBuf> {
    which::which(name).with_context(|| format!("{} not found on your system", name))
}

/// The avrdude programmer utility.
pub struct Avrdude {
    shell: Shell,
    path: PathBuf,
}

impl Avrdude {
    /// Use the avrdude found in `PATH`.
    pub fn locate() -> anyhow::Result<Self> {
        let path = locate("avrdude")?;
        log::debug!("Using avrdude at `{}`", path.display());
        Self::at(path)
    }

    /// Use the avrdude executable at `path`.
    pub fn at(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        Ok(Avrdude {
            shell: Shell::new()?,
            path: path.into(),
        })
    }
}

impl Programmer for Avrdude {
    fn read(&self, profile: &DeviceProfile, memtype: &MemType, dir: &Path) -> anyhow::Result<()> {
        let sh = &self.shell;
        // The output file in the -U operation is relative, since avrdude
        // splits the operation on colons.
        let _dir = sh.push_dir(dir);

        let avrdude = &self.path;
        let mcu = &profile.mcu;
        let programmer = &profile.programmer;
        let port = &profile.port;
        let operation = memtype.read_operation();

        cmd!(
            sh,
            "{avrdude} -p {mcu} -c {programmer} -P {port} -U {operation}"
        )
        .quiet()
        .ignore_stdout()
        .ignore_stderr()
        .run()
        .with_context(|| format!("avrdude could not read `{}`", memtype))
    }
}

/// avr-objdump from the AVR binutils.
pub struct AvrObjdump {
    shell: Shell,
    path: PathBuf,
}

impl AvrObjdump {
    pub fn locate() -> anyhow::Result<Self> {
        let path = locate("avr-objdump")?;
        log::debug!("Using avr-objdump at `{}`", path.display());
        Self::at(path)
    }

    pub fn at(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        Ok(AvrObjdump {
            shell: Shell::new()?,
            path: path.into(),
        })
    }
}

impl Disassembler for AvrObjdump {
    fn disassemble(&self, image: &Path) -> anyhow::Result<Vec<u8>> {
        let sh = &self.shell;
        let objdump = &self.path;
        let output = cmd!(sh, "{objdump} -b binary -m avr -D {image}")
            .quiet()
            .output()
            .with_context(|| format!("avr-objdump failed on `{}`", image.display()))?;
        Ok(output.stdout)
    }
}
