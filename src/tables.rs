use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use tokio_modbus::Address;

use crate::{
    core::{EmergencyPowerStatus, Identification, PowerFlows, PowerStatus},
    e3dc::registers,
    quantity::{power::Watts, proportions::Percent},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn directional_cell(power: Watts, inbound: Color, outbound: Color) -> Cell {
    let cell = Cell::new(power).set_alignment(CellAlignment::Right);
    if power.is_inbound() {
        cell.fg(inbound)
    } else if power.is_outbound() {
        cell.fg(outbound)
    } else {
        cell.add_attribute(Attribute::Dim)
    }
}

fn state_of_charge_cell(state_of_charge: Percent) -> Cell {
    Cell::new(state_of_charge).set_alignment(CellAlignment::Right).fg(
        if !state_of_charge.is_valid() {
            Color::Magenta
        } else if state_of_charge <= Percent(20) {
            Color::Red
        } else if state_of_charge <= Percent(50) {
            Color::DarkYellow
        } else {
            Color::Green
        },
    )
}

pub fn build_power_status_table(status: &PowerStatus) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Time", "Production", "Consumption", "Surplus", "SoC"]);
    table.add_row(vec![
        Cell::new(status.timestamp().format("%H:%M:%S")).add_attribute(Attribute::Dim),
        Cell::new(status.power_production()).set_alignment(CellAlignment::Right),
        Cell::new(status.power_consumption()).set_alignment(CellAlignment::Right),
        directional_cell(status.surplus(), Color::Green, Color::Red),
        state_of_charge_cell(status.battery_state_of_charge()),
    ]);
    table
}

pub fn build_power_flows_table(flows: &PowerFlows) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Flow", "Power"]);
    table.add_row(vec![Cell::new("Photovoltaic"), Cell::new(flows.photovoltaic)]);
    table.add_row(vec![
        Cell::new(if flows.is_battery_discharging() { "Battery (discharging)" } else { "Battery" }),
        directional_cell(flows.battery, Color::Green, Color::DarkYellow),
    ]);
    table.add_row(vec![Cell::new("Home"), Cell::new(flows.home)]);
    table.add_row(vec![
        Cell::new(if flows.is_feeding_in() { "Grid (feed-in)" } else { "Grid" }),
        directional_cell(flows.grid, Color::Red, Color::Green),
    ]);
    table.add_row(vec![Cell::new("Additional feeders"), Cell::new(flows.additional)]);
    table.add_row(vec![Cell::new("Wallbox"), Cell::new(flows.wallbox)]);
    table.add_row(vec![Cell::new("Wallbox solar"), Cell::new(flows.wallbox_solar)]);
    table.add_row(vec![Cell::new("Autarky"), Cell::new(flows.autarky)]);
    table.add_row(vec![Cell::new("Self-consumption"), Cell::new(flows.self_consumption)]);
    table.add_row(vec![
        Cell::new("State of charge"),
        state_of_charge_cell(flows.battery_state_of_charge),
    ]);
    table.add_row(vec![
        Cell::new("Emergency power"),
        Cell::new(flows.emergency_power).fg(match flows.emergency_power {
            EmergencyPowerStatus::Active | EmergencyPowerStatus::MotorSwitchError => Color::Red,
            EmergencyPowerStatus::NotActive => Color::Green,
            _ => Color::DarkYellow,
        }),
    ]);
    table.column_iter_mut().skip(1).for_each(|column| {
        column.set_cell_alignment(CellAlignment::Right);
    });
    table
}

pub fn build_identification_table(identification: &Identification) -> Table {
    let mut table = new_table();
    table.add_row(vec!["Manufacturer", identification.manufacturer.as_str()]);
    table.add_row(vec!["Model", identification.model.as_str()]);
    table.add_row(vec!["Serial number", identification.serial_number.as_str()]);
    table.add_row(vec!["Firmware release", identification.firmware_release.as_str()]);
    table.add_row(vec![
        Cell::new("Modbus firmware"),
        Cell::new(identification.modbus_firmware),
    ]);
    table.add_row(vec![Cell::new("Registers"), Cell::new(identification.register_count)]);
    table
}

pub fn build_registers_table(address: Address, words: &[u16]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Address", "Hex", "Unsigned", "Signed"]);
    for (address, word) in (u32::from(address)..).zip(words) {
        #[expect(clippy::cast_possible_wrap)]
        let signed = *word as i16;
        table.add_row(vec![
            Cell::new(address).add_attribute(Attribute::Dim),
            Cell::new(format!("{word:#06X}")),
            Cell::new(word).set_alignment(CellAlignment::Right),
            Cell::new(signed).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn build_register_map_table() -> Table {
    let mut table = new_table();
    table.set_header(vec!["Address", "Name", "Type", "Access", "Description"]);
    for register in registers::ALL {
        table.add_row(vec![
            Cell::new(register.address),
            Cell::new(register.name).add_attribute(Attribute::Bold),
            Cell::new(register.data_type),
            Cell::new(register.access),
            Cell::new(register.description).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_map_table_lists_all_registers_ok() {
        let table = build_register_map_table();
        assert_eq!(table.row_iter().count(), registers::ALL.len());
    }

    #[test]
    fn registers_table_ok() {
        let table = build_registers_table(40083, &[45, 0xFFFF]);
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("40084"));
        assert!(rendered.contains("-1"));
    }

    #[test]
    fn registers_table_past_last_address_ok() {
        let table = build_registers_table(Address::MAX, &[1, 2]);
        assert!(table.to_string().contains("65536"));
    }

    #[test]
    fn power_status_table_with_extreme_readings_ok() {
        let status = PowerStatus::builder()
            .power_production(Watts(i32::MAX))
            .power_consumption(Watts(-1))
            .battery_state_of_charge(Percent(45))
            .build();
        assert!(build_power_status_table(&status).to_string().contains("2147483647 W"));
    }
}
