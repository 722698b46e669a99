//! Synchronous Modbus TCP transport.

mod client;
mod endpoint;
mod error;
mod transport;
pub mod value;

#[cfg(test)]
pub mod simulator;

pub use self::{
    client::Client,
    endpoint::Endpoint,
    error::Error,
    transport::Transport,
    value::{DataType, Value},
};
