//! E3/DC S10 storage in the Modbus «Simple Mode».

mod error;
pub mod registers;
mod storage;

pub use self::{error::Error, registers::Register, storage::BatteryStorage};
