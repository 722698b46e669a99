mod registers;
mod status;
mod watch;

use clap::{Parser, Subcommand};

use crate::{
    api::modbus::Endpoint,
    cli::{
        registers::{ReadArgs, RegistersArgs, print_map},
        status::{FlowsArgs, IdentifyArgs, StatusArgs},
        watch::WatchArgs,
    },
    e3dc::BatteryStorage,
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read the current PV production, home consumption, and battery state of charge.
    #[clap(name = "status")]
    Status(StatusArgs),

    /// Read all the power flows of the Simple Mode block.
    #[clap(name = "flows")]
    Flows(FlowsArgs),

    /// Read the device identification.
    #[clap(name = "identify")]
    Identify(IdentifyArgs),

    /// Poll the status until terminated.
    #[clap(name = "watch")]
    Watch(WatchArgs),

    /// Read a single register from the register map by its name or address.
    #[clap(name = "read")]
    Read(ReadArgs),

    /// Dump raw holding registers.
    #[clap(name = "registers")]
    Registers(RegistersArgs),

    /// Print the register map.
    #[clap(name = "map")]
    Map,
}

impl Command {
    pub fn run(self) -> Result {
        match self {
            Self::Status(args) => args.run(),
            Self::Flows(args) => args.run(),
            Self::Identify(args) => args.run(),
            Self::Watch(args) => args.run(),
            Self::Read(args) => args.run(),
            Self::Registers(args) => args.run(),
            Self::Map => {
                print_map();
                Ok(())
            }
        }
    }
}

#[derive(Parser)]
pub struct ConnectionArgs {
    /// IP address or hostname of the E3/DC system.
    #[clap(long = "host", env = "E3DC_HOST", value_parser = parse_host)]
    pub host: String,

    /// Modbus TCP port of the E3/DC system.
    #[clap(
        long = "port",
        env = "E3DC_PORT",
        default_value_t = Endpoint::DEFAULT_PORT,
        value_parser = clap::value_parser!(u16).range(1..),
    )]
    pub port: u16,

    /// Response timeout for every request.
    #[clap(long = "timeout", env = "E3DC_TIMEOUT", default_value = "10s")]
    pub timeout: humantime::Duration,
}

impl ConnectionArgs {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port)
    }

    /// Build the storage reader and open the connection.
    pub fn connect(&self) -> Result<BatteryStorage> {
        let mut storage = BatteryStorage::new(self.endpoint(), Some(self.timeout.into()));
        storage.initialize().with_context(|| {
            format!("failed to initialize the connection to `{}`", self.endpoint())
        })?;
        Ok(storage)
    }
}

#[derive(Copy, Clone, Parser)]
pub struct OutputArgs {
    /// Print JSON instead of a table.
    #[clap(long)]
    pub json: bool,
}

fn parse_host(host: &str) -> Result<String, String> {
    let host = host.trim();
    if host.is_empty() {
        Err("the host must not be blank".to_owned())
    } else {
        Ok(host.to_owned())
    }
}
