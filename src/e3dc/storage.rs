use std::time::Duration;

use tokio_modbus::{Address, Quantity};

use crate::{
    api::modbus::{self, Endpoint, Transport, Value},
    core::{EmergencyPowerStatus, Identification, PowerFlows, PowerStatus},
    e3dc::{Error, Register, registers},
    prelude::*,
    quantity::{power::Watts, proportions::Percent},
};

/// E3/DC battery storage reader.
///
/// Every read is fail-fast: the first failed register read aborts the whole call
/// and no further registers are requested.
pub struct BatteryStorage<T = modbus::Client> {
    transport: T,
}

impl BatteryStorage {
    pub fn new(endpoint: Endpoint, timeout: Option<Duration>) -> Self {
        Self::with_transport(modbus::Client::new(endpoint).with_timeout(timeout))
    }
}

impl<T: Transport> BatteryStorage<T> {
    pub const fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn initialize(&mut self) -> Result<(), Error> {
        Ok(self.transport.initialize()?)
    }

    pub fn shutdown(&mut self) {
        self.transport.shutdown();
    }

    pub fn is_initialized(&self) -> bool {
        self.transport.is_connected()
    }

    /// Read the PV production, home consumption, and battery state of charge.
    #[instrument(skip_all)]
    pub fn get_current_power_status(&mut self) -> Result<PowerStatus, Error> {
        let power_production = self.read_watts(registers::PV_POWER)?;
        let power_consumption = self.read_watts(registers::HOME_POWER)?;
        let battery_state_of_charge = self.read_state_of_charge()?;
        info!(?power_production, ?power_consumption, ?battery_state_of_charge, "fetched");
        Ok(PowerStatus::builder()
            .power_production(power_production)
            .power_consumption(power_consumption)
            .battery_state_of_charge(battery_state_of_charge)
            .build())
    }

    #[instrument(skip_all)]
    pub fn get_power_flows(&mut self) -> Result<PowerFlows, Error> {
        let photovoltaic = self.read_watts(registers::PV_POWER)?;
        let battery = self.read_watts(registers::BATTERY_POWER)?;
        let home = self.read_watts(registers::HOME_POWER)?;
        let grid = self.read_watts(registers::GRID_POWER)?;
        let additional = self.read_watts(registers::ADDITIONAL_POWER)?;
        let wallbox = self.read_watts(registers::WALLBOX_POWER)?;
        let wallbox_solar = self.read_watts(registers::WALLBOX_SOLAR_POWER)?;
        let (autarky, self_consumption) =
            <(u8, u8)>::try_from(self.read_value(registers::AUTARKY_CONSUMPTION)?)?;
        let battery_state_of_charge = self.read_state_of_charge()?;
        let emergency_power = self.get_emergency_power_status()?;
        info!(?photovoltaic, ?battery, ?home, ?grid, autarky, self_consumption, "fetched");
        Ok(PowerFlows::builder()
            .photovoltaic(photovoltaic)
            .battery(battery)
            .home(home)
            .grid(grid)
            .additional(additional)
            .wallbox(wallbox)
            .wallbox_solar(wallbox_solar)
            .autarky(autarky.into())
            .self_consumption(self_consumption.into())
            .battery_state_of_charge(battery_state_of_charge)
            .emergency_power(emergency_power)
            .build())
    }

    #[instrument(skip_all)]
    pub fn get_emergency_power_status(&mut self) -> Result<EmergencyPowerStatus, Error> {
        let code = u16::try_from(self.read_value(registers::EMERGENCY_POWER_STATUS)?)?;
        Ok(EmergencyPowerStatus::from(code))
    }

    /// Read the identification block, verifying the magic value first.
    #[instrument(skip_all)]
    pub fn get_identification(&mut self) -> Result<Identification, Error> {
        let magic = u16::try_from(self.read_value(registers::MAGIC)?)?;
        if magic != registers::MAGIC_VALUE {
            return Err(Error::InvalidMagic(magic));
        }
        let identification = Identification {
            modbus_firmware: <(u8, u8)>::try_from(self.read_value(registers::MODBUS_FIRMWARE)?)?
                .into(),
            register_count: u16::try_from(self.read_value(registers::REGISTER_COUNT)?)?,
            manufacturer: String::try_from(self.read_value(registers::MANUFACTURER)?)?,
            model: String::try_from(self.read_value(registers::MODEL)?)?,
            serial_number: String::try_from(self.read_value(registers::SERIAL_NUMBER)?)?,
            firmware_release: String::try_from(self.read_value(registers::FIRMWARE_RELEASE)?)?,
        };
        info!(
            model = %identification.model,
            serial_number = %identification.serial_number,
            "identified",
        );
        Ok(identification)
    }

    /// Read and decode a single register from the map.
    #[instrument(skip_all, level = "debug", fields(register = register.name))]
    pub fn read_value(&mut self, register: Register) -> Result<Value, Error> {
        let words = self.read_words(register.address, register.num_words())?;
        Ok(register.data_type.decode(&words)?)
    }

    /// Read raw words, not necessarily aligned with the register map.
    pub fn read_words(&mut self, address: Address, quantity: Quantity) -> Result<Vec<u16>, Error> {
        Ok(self.transport.read_holding_registers(address, quantity)?)
    }

    fn read_watts(&mut self, register: Register) -> Result<Watts, Error> {
        Ok(Watts(i32::try_from(self.read_value(register)?)?))
    }

    fn read_state_of_charge(&mut self) -> Result<Percent, Error> {
        let state_of_charge = Percent(u16::try_from(self.read_value(registers::BATTERY_SOC)?)?);
        if !state_of_charge.is_valid() {
            warn!(?state_of_charge, "the state of charge is out of range");
        }
        Ok(state_of_charge)
    }
}
