use tokio_modbus::{Address, Quantity};

use crate::api::modbus::Error;

/// Connection lifecycle and register access of a single Modbus session.
pub trait Transport {
    /// Open the connection.
    fn initialize(&mut self) -> Result<(), Error>;

    /// Close the connection if it is open.
    ///
    /// Never fails: close errors are only logged.
    fn shutdown(&mut self);

    fn is_connected(&self) -> bool;

    /// Read exactly `quantity` consecutive holding registers starting at `address`.
    fn read_holding_registers(
        &mut self,
        address: Address,
        quantity: Quantity,
    ) -> Result<Vec<u16>, Error>;
}
