use std::{io, net::SocketAddr, time::Duration};

use tokio::{
    net::TcpStream,
    runtime::{self, Runtime},
    time::timeout,
};
use tokio_modbus::{
    Address,
    Quantity,
    Slave,
    client::{Client as _, Context, Reader as _, tcp::attach_slave},
};

use crate::{
    api::modbus::{Endpoint, Error, Transport},
    prelude::*,
};

/// Blocking Modbus TCP client owning a single connection.
///
/// The client drives the asynchronous Modbus context on its own current-thread runtime,
/// so callers never need one.
pub struct Client {
    endpoint: Endpoint,
    timeout: Option<Duration>,
    runtime: Option<Runtime>,
    context: Option<Context>,
}

impl Client {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a client. No I/O happens until [`Transport::initialize`].
    pub const fn new(endpoint: Endpoint) -> Self {
        Self { endpoint, timeout: Some(Self::DEFAULT_TIMEOUT), runtime: None, context: None }
    }

    /// Override the connect and per-request timeout, `None` blocks indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn runtime(&mut self) -> Result<&Runtime, Error> {
        let runtime = match self.runtime.take() {
            Some(runtime) => runtime,
            None => runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(Error::Runtime)?,
        };
        Ok(self.runtime.insert(runtime))
    }

    fn connect(&mut self, address: SocketAddr) -> Result<Context, Error> {
        let slave = Slave(self.endpoint.slave_id);
        let connect_timeout = self.timeout;
        let tcp_stream = self.runtime()?.block_on(async {
            let connect = TcpStream::connect(address);
            let tcp_stream = match connect_timeout {
                Some(duration) => timeout(duration, connect).await.map_err(|_| {
                    io::Error::new(io::ErrorKind::TimedOut, "timed out while connecting")
                })??,
                None => connect.await?,
            };
            tcp_stream.set_nodelay(true)?;
            Ok::<_, io::Error>(tcp_stream)
        });
        let tcp_stream = tcp_stream
            .map_err(|source| Error::Connect { endpoint: self.endpoint.to_string(), source })?;
        Ok(attach_slave(tcp_stream, slave))
    }
}

impl Transport for Client {
    #[instrument(skip_all, fields(endpoint = %self.endpoint, slave_id = self.endpoint.slave_id))]
    fn initialize(&mut self) -> Result<(), Error> {
        if self.context.is_some() {
            warn!("already connected, reconnecting…");
            self.shutdown();
        }
        let address = self.endpoint.resolve()?;
        info!(%address, "connecting…");
        let context = self.connect(address)?;
        self.context = Some(context);
        info!("connected");
        Ok(())
    }

    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    fn shutdown(&mut self) {
        let Some(mut context) = self.context.take() else {
            return;
        };
        info!("disconnecting…");
        let Some(runtime) = &self.runtime else {
            return;
        };
        if let Err(error) = runtime.block_on(context.disconnect()) {
            warn!("failed to disconnect: {error:#}");
        }
    }

    fn is_connected(&self) -> bool {
        self.context.is_some()
    }

    #[instrument(skip_all, level = "debug", fields(address = address, quantity = quantity))]
    fn read_holding_registers(
        &mut self,
        address: Address,
        quantity: Quantity,
    ) -> Result<Vec<u16>, Error> {
        let (Some(runtime), Some(context)) = (&self.runtime, &mut self.context) else {
            return Err(Error::NotConnected);
        };
        let read_timeout = self.timeout;
        let words = runtime.block_on(async {
            let read = context.read_holding_registers(address, quantity);
            match read_timeout {
                Some(duration) => timeout(duration, read).await.map_err(|_| Error::Timeout),
                None => Ok(read.await),
            }
        })???;
        if words.len() != usize::from(quantity) {
            return Err(Error::UnexpectedLength {
                expected: usize::from(quantity),
                actual: words.len(),
            });
        }
        debug!(?words, "read");
        Ok(words)
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::modbus::simulator::{RegisterBank, spawn_server};

    #[test]
    fn shutdown_without_initialize_ok() {
        let mut client = Client::new(Endpoint::new("127.0.0.1", 1502));
        client.shutdown();
        client.shutdown();
        assert!(!client.is_connected());
    }

    #[test]
    fn read_without_initialize_fails() {
        let mut client = Client::new(Endpoint::new("127.0.0.1", 1502));
        assert!(matches!(client.read_holding_registers(40068, 2), Err(Error::NotConnected)));
    }

    #[test]
    fn read_holding_registers_ok() -> Result {
        let (_runtime, address) =
            spawn_server(RegisterBank::default().with_words(40068, &[0x0000, 0x01F4]))?;
        let mut client = Client::new(Endpoint::new(address.ip().to_string(), address.port()));
        client.initialize()?;
        assert!(client.is_connected());
        assert_eq!(client.read_holding_registers(40068, 2)?, vec![0x0000, 0x01F4]);
        client.shutdown();
        client.shutdown();
        assert!(!client.is_connected());
        Ok(())
    }

    #[test]
    fn exception_response_ok() -> Result {
        let (_runtime, address) = spawn_server(RegisterBank::default())?;
        let mut client = Client::new(Endpoint::new(address.ip().to_string(), address.port()));
        client.initialize()?;
        let error = client.read_holding_registers(40068, 2).unwrap_err();
        assert!(matches!(error, Error::Exception(tokio_modbus::ExceptionCode::IllegalDataAddress)));
        Ok(())
    }

    #[test]
    fn initialize_twice_reconnects_ok() -> Result {
        let (_runtime, address) =
            spawn_server(RegisterBank::default().with_words(40083, &[45]))?;
        let mut client = Client::new(Endpoint::new(address.ip().to_string(), address.port()));
        client.initialize()?;
        client.initialize()?;
        assert_eq!(client.read_holding_registers(40083, 1)?, vec![45]);
        client.shutdown();
        assert!(!client.is_connected());
        Ok(())
    }

    #[test]
    fn silent_device_times_out() -> Result {
        // The listener never accepts, so requests are never answered.
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let address = listener.local_addr()?;
        let mut client = Client::new(Endpoint::new(address.ip().to_string(), address.port()))
            .with_timeout(Some(Duration::from_millis(200)));
        client.initialize()?;
        assert!(matches!(client.read_holding_registers(40068, 2), Err(Error::Timeout)));
        client.shutdown();
        Ok(())
    }

    #[test]
    fn connection_refused_fails() -> Result {
        // Bind and immediately release a port so nothing listens on it.
        let address = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;
        let mut client = Client::new(Endpoint::new(address.ip().to_string(), address.port()))
            .with_timeout(Some(Duration::from_secs(1)));
        assert!(matches!(client.initialize(), Err(Error::Connect { .. })));
        assert!(!client.is_connected());
        Ok(())
    }
}
