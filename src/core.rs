pub mod emergency_power;
pub mod identification;
pub mod power_flows;
pub mod power_status;

pub use self::{
    emergency_power::EmergencyPowerStatus,
    identification::Identification,
    power_flows::PowerFlows,
    power_status::PowerStatus,
};
