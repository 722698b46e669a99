use std::fmt::{Display, Formatter};

use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
}

impl From<(u8, u8)> for FirmwareVersion {
    fn from((major, minor): (u8, u8)) -> Self {
        Self { major, minor }
    }
}

impl Display for FirmwareVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Identification block of the storage.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Identification {
    pub modbus_firmware: FirmwareVersion,
    pub register_count: u16,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_release: String,
}
