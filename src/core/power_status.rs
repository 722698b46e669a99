use bon::Builder;
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::quantity::{power::Watts, proportions::Percent};

/// Most important battery storage readings at a point in time.
#[must_use]
#[derive(Clone, Debug, Serialize, Builder)]
pub struct PowerStatus {
    /// Defaults to the moment the snapshot gets built, that is after all the readings.
    #[builder(default = Local::now())]
    timestamp: DateTime<Local>,

    /// Photovoltaic production.
    power_production: Watts,

    /// Home consumption.
    power_consumption: Watts,

    battery_state_of_charge: Percent,
}

impl PowerStatus {
    pub const fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub const fn power_production(&self) -> Watts {
        self.power_production
    }

    pub const fn power_consumption(&self) -> Watts {
        self.power_consumption
    }

    pub const fn battery_state_of_charge(&self) -> Percent {
        self.battery_state_of_charge
    }

    /// Production left after covering the home consumption, negative when short.
    ///
    /// Saturates at the `i32` bounds since both readings may span the whole register range.
    pub const fn surplus(&self) -> Watts {
        Watts(self.power_production.0.saturating_sub(self.power_consumption.0))
    }
}
