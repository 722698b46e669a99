use crate::api::modbus;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Modbus(#[from] modbus::Error),

    #[error("unexpected magic value {0:#06X} instead of 0xE3DC, is it an E3/DC device?")]
    InvalidMagic(u16),

    #[error("`{0}` is not in the register map")]
    UnknownRegister(String),
}
