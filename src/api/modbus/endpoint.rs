use std::{
    fmt::{Display, Formatter},
    net::{SocketAddr, ToSocketAddrs},
};

use tokio_modbus::SlaveId;

use crate::api::modbus::Error;

/// Modbus slave connection endpoint.
#[derive(Clone, Eq, Hash, PartialEq, Debug)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub slave_id: SlaveId,
}

impl Endpoint {
    pub const DEFAULT_PORT: u16 = 502;

    /// E3/DC answers on unit #1 only.
    pub const DEFAULT_SLAVE_ID: SlaveId = 1;

    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port, slave_id: Self::DEFAULT_SLAVE_ID }
    }

    /// Resolve the host into the first matching socket address.
    pub fn resolve(&self) -> Result<SocketAddr, Error> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|source| Error::Resolve { endpoint: self.to_string(), source })?
            .next()
            .ok_or_else(|| Error::Unresolved(self.to_string()))
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
