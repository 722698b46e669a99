use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Emergency power (backup) status as reported by the storage.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyPowerStatus {
    /// Older device generations, for example S10-SP40 and S10-P5002.
    NotSupported,

    /// The grid is down and the house runs on the battery.
    Active,

    NotActive,
    NotAvailable,

    /// The S10 E motor switch is not in the correct position: switched off manually or never on.
    MotorSwitchError,

    Unknown(u16),
}

impl From<u16> for EmergencyPowerStatus {
    fn from(code: u16) -> Self {
        match code {
            0 => Self::NotSupported,
            1 => Self::Active,
            2 => Self::NotActive,
            3 => Self::NotAvailable,
            4 => Self::MotorSwitchError,
            _ => Self::Unknown(code),
        }
    }
}

impl Display for EmergencyPowerStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSupported => write!(f, "emergency power is not supported"),
            Self::Active => write!(f, "emergency power is active (grid outage)"),
            Self::NotActive => write!(f, "emergency power is not active"),
            Self::NotAvailable => write!(f, "emergency power is not available"),
            Self::MotorSwitchError => write!(f, "motor switch is not in the correct position"),
            Self::Unknown(code) => write!(f, "unknown status: {code}"),
        }
    }
}
