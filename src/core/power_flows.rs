use bon::Builder;
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::{
    core::EmergencyPowerStatus,
    quantity::{power::Watts, proportions::Percent},
};

/// All power readings of the Simple Mode block.
///
/// Battery power is negative while discharging, grid power is negative while feeding in.
#[must_use]
#[derive(Clone, Debug, Serialize, Builder)]
pub struct PowerFlows {
    #[builder(default = Local::now())]
    pub timestamp: DateTime<Local>,

    pub photovoltaic: Watts,
    pub battery: Watts,
    pub home: Watts,
    pub grid: Watts,

    /// All additional feeders.
    pub additional: Watts,

    pub wallbox: Watts,
    pub wallbox_solar: Watts,
    pub autarky: Percent,
    pub self_consumption: Percent,
    pub battery_state_of_charge: Percent,
    pub emergency_power: EmergencyPowerStatus,
}

impl PowerFlows {
    #[must_use]
    pub const fn is_battery_discharging(&self) -> bool {
        self.battery.is_outbound()
    }

    #[must_use]
    pub const fn is_feeding_in(&self) -> bool {
        self.grid.is_outbound()
    }
}
