//! Simulated device for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::bail;

use crate::memtype::MemType;
use crate::profile::DeviceProfile;
use crate::tool::{Disassembler, Programmer};

/// Programmer that succeeds for a fixed set of memory types.
#[derive(Default)]
pub struct FakeProgrammer {
    memory: HashMap<String, Vec<u8>>,
    /// Memory types that report success without writing a file.
    silent: Vec<String>,
    /// Every read as (memtype, directory), in order.
    pub reads: RefCell<Vec<(String, PathBuf)>>,
}

impl FakeProgrammer {
    pub fn with_memtypes(memtypes: &[&str]) -> Self {
        let mut programmer = FakeProgrammer::default();
        for memtype in memtypes {
            programmer = programmer.with_memory(memtype, &[0xff]);
        }
        programmer
    }

    pub fn with_memory(mut self, memtype: &str, data: &[u8]) -> Self {
        self.memory.insert(memtype.to_owned(), data.to_vec());
        self
    }

    pub fn with_silent_success(mut self, memtype: &str) -> Self {
        self.silent.push(memtype.to_owned());
        self
    }

    pub fn read_names(&self) -> Vec<String> {
        self.reads
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl Programmer for FakeProgrammer {
    fn read(&self, _profile: &DeviceProfile, memtype: &MemType, dir: &Path) -> anyhow::Result<()> {
        self.reads
            .borrow_mut()
            .push((memtype.name().to_owned(), dir.to_owned()));

        if self.silent.iter().any(|name| name == memtype.name()) {
            return Ok(());
        }

        match self.memory.get(memtype.name()) {
            Some(data) => {
                fs::write(dir.join(memtype.file_name()), data)?;
                Ok(())
            }
            None => bail!("unsupported memory type `{}`", memtype),
        }
    }
}

/// Disassembler that returns a fixed listing.
pub struct FakeDisassembler(pub &'static str);

impl Disassembler for FakeDisassembler {
    fn disassemble(&self, image: &Path) -> anyhow::Result<Vec<u8>> {
        let data = fs::read(image)?;
        Ok(format!("{} ({} bytes)\n", self.0, data.len()).into_bytes())
    }
}

pub fn profile() -> DeviceProfile {
    DeviceProfile::new("m328p", "/dev/ttyUSB0", "arduino")
}
