use clap::Parser;
use serde::Serialize;

use crate::{
    cli::{ConnectionArgs, OutputArgs},
    e3dc::BatteryStorage,
    prelude::*,
    tables::{build_identification_table, build_power_flows_table, build_power_status_table},
};

#[derive(Parser)]
pub struct StatusArgs {
    #[clap(flatten)]
    pub connection: ConnectionArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

impl StatusArgs {
    pub fn run(self) -> Result {
        let status = read_once(&self.connection, BatteryStorage::get_current_power_status)?;
        if self.output.json {
            print_json(&status)
        } else {
            println!("{}", build_power_status_table(&status));
            Ok(())
        }
    }
}

#[derive(Parser)]
pub struct FlowsArgs {
    #[clap(flatten)]
    pub connection: ConnectionArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

impl FlowsArgs {
    pub fn run(self) -> Result {
        let flows = read_once(&self.connection, BatteryStorage::get_power_flows)?;
        if self.output.json {
            print_json(&flows)
        } else {
            println!("{}", build_power_flows_table(&flows));
            Ok(())
        }
    }
}

#[derive(Parser)]
pub struct IdentifyArgs {
    #[clap(flatten)]
    pub connection: ConnectionArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

impl IdentifyArgs {
    pub fn run(self) -> Result {
        let identification = read_once(&self.connection, BatteryStorage::get_identification)?;
        if self.output.json {
            print_json(&identification)
        } else {
            println!("{}", build_identification_table(&identification));
            Ok(())
        }
    }
}

/// Connect, perform a single read, and always shut the connection down afterwards.
pub fn read_once<T, E>(
    connection: &ConnectionArgs,
    read: impl FnOnce(&mut BatteryStorage) -> Result<T, E>,
) -> Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let mut storage = connection.connect()?;
    let result = read(&mut storage);
    storage.shutdown();
    result.context("failed to read from the storage")
}

pub fn print_json(value: &impl Serialize) -> Result {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
