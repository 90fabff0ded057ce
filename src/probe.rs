//! Find out which memory types the attached device supports.
//!
//! avrdude does not have a way to list the memory types of a part
//! that actually work with a given programmer, so we simply try to
//! read each of them and see which reads succeed.

use std::path::Path;

use anyhow::Context;

use crate::memtype::MemType;
use crate::profile::DeviceProfile;
use crate::tool::Programmer;

/// Upper bound on the numbered fuse scan.
pub const MAX_NUMBERED_FUSES: usize = 256;

/// Probe the device and store the supported memory types in `profile`.
///
/// `candidates` are tried in order, followed by numbered fuse banks
/// (`fuse0`, `fuse1`, ...). Probe reads go to a scratch directory that
/// is removed when probing finishes.
pub fn probe<P>(
    programmer: &P,
    profile: &mut DeviceProfile,
    candidates: Vec<MemType>,
) -> anyhow::Result<()>
where
    P: Programmer + ?Sized,
{
    let scratch = tempfile::Builder::new()
        .prefix("avr-memdump-probe-")
        .tempdir()
        .context("Cannot create scratch directory for probing")?;

    let mut memtypes = supported_memtypes(programmer, profile, &candidates, scratch.path());
    let fuses = numbered_fuses(programmer, profile, scratch.path());

    log::info!("{}", summary(&memtypes, &candidates, &fuses));

    memtypes.extend(fuses);

    profile.memtypes = memtypes;

    Ok(())
}

/// Fixed memory types are counted against the candidates, numbered
/// fuses separately.
fn summary(supported: &[MemType], candidates: &[MemType], fuses: &[MemType]) -> String {
    format!(
        "Device supports {} of {} known memory types and {} numbered fuses",
        supported.len(),
        candidates.len(),
        fuses.len()
    )
}

fn try_read<P>(programmer: &P, profile: &DeviceProfile, memtype: &MemType, dir: &Path) -> bool
where
    P: Programmer + ?Sized,
{
    match programmer.read(profile, memtype, dir) {
        Ok(()) => {
            log::debug!("Probe of `{}` succeeded", memtype);
            true
        }
        Err(err) => {
            log::debug!("Probe of `{}` failed: {:#}", memtype, err);
            false
        }
    }
}

/// Candidates that can be read, in candidate order.
fn supported_memtypes<P>(
    programmer: &P,
    profile: &DeviceProfile,
    candidates: &[MemType],
    dir: &Path,
) -> Vec<MemType>
where
    P: Programmer + ?Sized,
{
    candidates
        .iter()
        .filter(|memtype| try_read(programmer, profile, memtype, dir))
        .cloned()
        .collect()
}

/// Scan `fuse0`, `fuse1`, ... until a read fails.
///
/// Some parts number their fuses from 1, so a failure of `fuse0` does
/// not end the scan.
fn numbered_fuses<P>(programmer: &P, profile: &DeviceProfile, dir: &Path) -> Vec<MemType>
where
    P: Programmer + ?Sized,
{
    let mut fuses = Vec::new();
    for index in 0..MAX_NUMBERED_FUSES {
        let memtype = MemType::numbered_fuse(index);
        if try_read(programmer, profile, &memtype, dir) {
            fuses.push(memtype);
        } else if index > 0 {
            break;
        }
    }
    fuses
}
