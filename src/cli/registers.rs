use clap::Parser;
use tokio_modbus::{Address, Quantity};

use crate::{
    cli::{
        ConnectionArgs,
        OutputArgs,
        status::{print_json, read_once},
    },
    e3dc::{Error, Register},
    prelude::*,
    tables::{build_register_map_table, build_registers_table},
};

#[derive(Parser)]
pub struct ReadArgs {
    #[clap(flatten)]
    pub connection: ConnectionArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// Register name (for example, `grid_power`) or address (for example, `40074`).
    pub register: String,
}

impl ReadArgs {
    pub fn run(self) -> Result {
        let register =
            Register::find(&self.register).ok_or_else(|| Error::UnknownRegister(self.register))?;
        let value = read_once(&self.connection, |storage| storage.read_value(register))?;
        if self.output.json {
            print_json(&value)
        } else {
            println!("{} = {value}", register.name);
            Ok(())
        }
    }
}

#[derive(Parser)]
pub struct RegistersArgs {
    #[clap(flatten)]
    pub connection: ConnectionArgs,

    /// First register address.
    pub address: Address,

    /// Number of registers to read.
    #[clap(
        long,
        default_value = "1",
        value_parser = clap::value_parser!(u16).range(1..=125),
    )]
    pub count: Quantity,
}

impl RegistersArgs {
    pub fn run(self) -> Result {
        let words =
            read_once(&self.connection, |storage| storage.read_words(self.address, self.count))?;
        println!("{}", build_registers_table(self.address, &words));
        Ok(())
    }
}

pub fn print_map() {
    println!("{}", build_register_map_table());
}
