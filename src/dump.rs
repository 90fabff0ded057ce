use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::memtype::MemType;
use crate::profile::DeviceProfile;
use crate::tool::Programmer;

/// Raw contents of one memory type.
#[derive(Clone, Debug)]
pub struct MemoryImage {
    pub memtype: MemType,
    pub path: PathBuf,
    pub data: Vec<u8>,
}

/// Memory images that were dumped successfully.
#[derive(Clone, Debug, Default)]
pub struct Dump {
    pub images: Vec<MemoryImage>,
}

impl Dump {
    pub fn memtypes(&self) -> impl Iterator<Item = &MemType> {
        self.images.iter().map(|image| &image.memtype)
    }

    pub fn image(&self, name: &str) -> Option<&MemoryImage> {
        self.images
            .iter()
            .find(|image| image.memtype.name() == name)
    }
}

/// Dump all memory types of `profile` into `dir`.
///
/// avrdude writes into a staging directory inside `dir`, and only
/// images that were read successfully replace the files in `dir`. An
/// earlier dump of a memory type that fails this time is left alone.
///
/// Memory types that fail to read, or that do not leave a readable
/// file behind, are left out of the result.
pub fn dump<P>(programmer: &P, profile: &DeviceProfile, dir: &Path) -> anyhow::Result<Dump>
where
    P: Programmer + ?Sized,
{
    let staging = tempfile::Builder::new()
        .prefix(".avr-memdump-")
        .tempdir_in(dir)
        .with_context(|| format!("Cannot create staging directory in `{}`", dir.display()))?;

    let mut read = Vec::new();
    for memtype in &profile.memtypes {
        match programmer.read(profile, memtype, staging.path()) {
            Ok(()) => read.push(memtype.clone()),
            Err(err) => log::debug!("Skipping `{}`: {:#}", memtype, err),
        }
    }

    // avrdude sometimes exits successfully without writing anything,
    // only trust what is actually on disk.
    let images = read
        .into_iter()
        .filter_map(|memtype| {
            let staged = staging.path().join(memtype.file_name());
            let path = dir.join(memtype.file_name());
            match fs::read(&staged).and_then(|data| fs::rename(&staged, &path).map(|()| data)) {
                Ok(data) => Some(MemoryImage {
                    memtype,
                    path,
                    data,
                }),
                Err(err) => {
                    log::debug!("No dump of `{}` at `{}`: {}", memtype, staged.display(), err);
                    None
                }
            }
        })
        .collect();

    Ok(Dump { images })
}
