#[macro_use]
pub mod macros;

pub mod power;
pub mod proportions;
