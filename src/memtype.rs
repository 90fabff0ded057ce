use std::fmt;

/// Memory types that avrdude knows about, in probing order.
const KNOWN_MEMTYPES: &[&str] = &[
    "eeprom",
    "efuse",
    "flash",
    "fuse",
    "hfuse",
    "lfuse",
    "lock",
    "signature",
    "application",
    "apptable",
    "boot",
    "prodsig",
    "usersig",
];

/// Fixed fuse-like memory types, reported bit by bit.
const FUSE_MEMTYPES: &[&str] = &["fuse", "lfuse", "hfuse", "efuse", "lock"];

pub const FLASH: &str = "flash";
pub const SIGNATURE: &str = "signature";

/// Name of one class of device memory, e.g. `eeprom` or `fuse1`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MemType(String);

impl MemType {
    pub fn new(name: impl Into<String>) -> Self {
        MemType(name.into())
    }

    /// Fixed memory types to probe for.
    ///
    /// Every call builds a new list, so callers are free to consume it.
    pub fn candidates() -> Vec<MemType> {
        KNOWN_MEMTYPES.iter().copied().map(MemType::new).collect()
    }

    /// Extended fuse bank with the given index, e.g. `fuse0`.
    pub fn numbered_fuse(index: usize) -> Self {
        MemType(format!("fuse{}", index))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// File that a read of this memory type is stored in.
    pub fn file_name(&self) -> String {
        format!("{}.bin", self.0)
    }

    /// avrdude `-U` operation that reads this memory type into
    /// [`MemType::file_name`] as raw binary.
    pub fn read_operation(&self) -> String {
        format!("{0}:r:{0}.bin:r", self.0)
    }

    pub fn is_fuse(&self) -> bool {
        if FUSE_MEMTYPES.contains(&self.name()) {
            return true;
        }

        match self.0.strip_prefix("fuse") {
            Some(index) => !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }
}

impl fmt::Display for MemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::MemType;

    #[test]
    fn read_operation_names_file_after_memtype() {
        let memtype = MemType::new("eeprom");
        assert_eq!(memtype.file_name(), "eeprom.bin");
        assert_eq!(memtype.read_operation(), "eeprom:r:eeprom.bin:r");
    }

    #[test]
    fn candidates_are_not_shared_between_calls() {
        let mut first = MemType::candidates();
        first.clear();
        first.push(MemType::new("bogus"));

        let second = MemType::candidates();
        assert_eq!(second.len(), 13);
        assert_eq!(second[0].name(), "eeprom");
        assert!(!second.contains(&MemType::new("bogus")));
    }

    #[test]
    fn fuse_classification() {
        for fuse in ["fuse", "lfuse", "hfuse", "efuse", "lock", "fuse0", "fuse12"] {
            assert!(MemType::new(fuse).is_fuse(), "{} should be a fuse", fuse);
        }
        for other in ["eeprom", "flash", "signature", "fusex", "usersig"] {
            assert!(!MemType::new(other).is_fuse(), "{} is not a fuse", other);
        }
        assert_eq!(MemType::numbered_fuse(3).name(), "fuse3");
    }
}
