//! Simple Mode register map.
//!
//! Addresses are the documented «4xxxx» register numbers and are sent on the wire as is.

use std::fmt::{Display, Formatter};

use tokio_modbus::{Address, Quantity};

use crate::api::modbus::DataType;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Access {
    Read,
    ReadWrite,
}

impl Display for Access {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "R"),
            Self::ReadWrite => write!(f, "RW"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Register {
    pub name: &'static str,
    pub address: Address,
    pub data_type: DataType,
    pub access: Access,
    pub description: &'static str,
}

impl Register {
    const fn read(
        name: &'static str,
        address: Address,
        data_type: DataType,
        description: &'static str,
    ) -> Self {
        Self { name, address, data_type, access: Access::Read, description }
    }

    pub const fn num_words(&self) -> Quantity {
        self.data_type.num_words()
    }

    /// Find the register by its name or its address.
    pub fn find(key: &str) -> Option<Self> {
        match key.parse::<Address>() {
            Ok(address) => ALL.into_iter().find(|register| register.address == address),
            Err(_) => ALL.into_iter().find(|register| register.name.eq_ignore_ascii_case(key)),
        }
    }
}

const TEXT: DataType = DataType::Text { n_words: 16 };

/// Always `0xE3DC`.
pub const MAGIC: Register = Register::read("magic", 40001, DataType::U16, "S10 Modbus ID");
pub const MODBUS_FIRMWARE: Register =
    Register::read("modbus_firmware", 40002, DataType::BytePair, "S10 Modbus firmware version");
pub const REGISTER_COUNT: Register =
    Register::read("register_count", 40003, DataType::U16, "Number of supported registers");
pub const MANUFACTURER: Register = Register::read("manufacturer", 40004, TEXT, "Manufacturer");
pub const MODEL: Register = Register::read("model", 40020, TEXT, "Model");
pub const SERIAL_NUMBER: Register = Register::read("serial_number", 40036, TEXT, "Serial number");
pub const FIRMWARE_RELEASE: Register =
    Register::read("firmware_release", 40052, TEXT, "S10 firmware release");

pub const PV_POWER: Register =
    Register::read("pv_power", 40068, DataType::I32, "Photovoltaic power, W");
pub const BATTERY_POWER: Register = Register::read(
    "battery_power",
    40070,
    DataType::I32,
    "Battery power, W, negative while discharging",
);
pub const HOME_POWER: Register =
    Register::read("home_power", 40072, DataType::I32, "Home consumption, W");
pub const GRID_POWER: Register = Register::read(
    "grid_power",
    40074,
    DataType::I32,
    "Grid power, W, negative while feeding in",
);
pub const ADDITIONAL_POWER: Register =
    Register::read("additional_power", 40076, DataType::I32, "All additional feeders, W");
pub const WALLBOX_POWER: Register =
    Register::read("wallbox_power", 40078, DataType::I32, "Wallbox power, W");
pub const WALLBOX_SOLAR_POWER: Register =
    Register::read("wallbox_solar_power", 40080, DataType::I32, "Wallbox solar power, W");

/// Autarky in the high byte, self-consumption in the low byte.
pub const AUTARKY_CONSUMPTION: Register = Register::read(
    "autarky_consumption",
    40082,
    DataType::BytePair,
    "Autarky and self-consumption, %",
);
pub const BATTERY_SOC: Register =
    Register::read("battery_soc", 40083, DataType::U16, "Battery state of charge, %");
pub const EMERGENCY_POWER_STATUS: Register =
    Register::read("emergency_power_status", 40084, DataType::U16, "Emergency power status");
pub const EMS_STATUS: Register =
    Register::read("ems_status", 40085, DataType::U16, "Energy management system status");
pub const EMS_REMOTE_CONTROL: Register =
    Register::read("ems_remote_control", 40086, DataType::I16, "EMS remote control");
pub const EMS_CONTROL: Register =
    Register::read("ems_control", 40087, DataType::U16, "EMS control");

/// Writable, but never written here.
pub const WALLBOX_0_CONTROL: Register = Register {
    name: "wallbox_0_control",
    address: 40088,
    data_type: DataType::U16,
    access: Access::ReadWrite,
    description: "Wallbox 0 control",
};

pub const ALL: [Register; 21] = [
    MAGIC,
    MODBUS_FIRMWARE,
    REGISTER_COUNT,
    MANUFACTURER,
    MODEL,
    SERIAL_NUMBER,
    FIRMWARE_RELEASE,
    PV_POWER,
    BATTERY_POWER,
    HOME_POWER,
    GRID_POWER,
    ADDITIONAL_POWER,
    WALLBOX_POWER,
    WALLBOX_SOLAR_POWER,
    AUTARKY_CONSUMPTION,
    BATTERY_SOC,
    EMERGENCY_POWER_STATUS,
    EMS_STATUS,
    EMS_REMOTE_CONTROL,
    EMS_CONTROL,
    WALLBOX_0_CONTROL,
];

pub const MAGIC_VALUE: u16 = 0xE3DC;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_do_not_overlap_ok() {
        for pair in ALL.windows(2) {
            assert!(
                pair[0].address + pair[0].num_words() <= pair[1].address,
                "{} overlaps {}",
                pair[0].name,
                pair[1].name,
            );
        }
    }

    #[test]
    fn only_wallbox_control_is_writable_ok() {
        let writable: Vec<_> = ALL
            .iter()
            .filter(|register| register.access == Access::ReadWrite)
            .map(|register| register.name)
            .collect();
        assert_eq!(writable, ["wallbox_0_control"]);
    }

    #[test]
    fn find_ok() {
        assert_eq!(Register::find("PV_POWER"), Some(PV_POWER));
        assert_eq!(Register::find("40083"), Some(BATTERY_SOC));
        assert_eq!(Register::find("40069"), None);
        assert_eq!(Register::find("nope"), None);
    }
}
