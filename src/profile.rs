use crate::memtype::MemType;

/// Programmer protocol used when none is given.
pub const DEFAULT_PROGRAMMER: &str = "arduino";

/// The device that is probed and dumped.
#[derive(Clone, Debug)]
pub struct DeviceProfile {
    /// avrdude part name, e.g. `m328p` for an Arduino Uno.
    pub mcu: String,

    /// Port the board is connected to, e.g. `/dev/ttyUSB0`.
    pub port: String,

    /// avrdude programmer protocol, e.g. `arduino` or `stk500v2`.
    pub programmer: String,

    /// Memory types confirmed to be readable. Empty until probed.
    pub memtypes: Vec<MemType>,
}

impl DeviceProfile {
    pub fn new(
        mcu: impl Into<String>,
        port: impl Into<String>,
        programmer: impl Into<String>,
    ) -> Self {
        DeviceProfile {
            mcu: mcu.into(),
            port: port.into(),
            programmer: programmer.into(),
            memtypes: Vec::new(),
        }
    }
}
