//! In-memory register banks for tests: a simulated [`Transport`] and an in-process TCP server.

use std::{
    collections::{HashMap, HashSet},
    future,
    io,
    net::SocketAddr,
    sync::Arc,
};

use tokio::{net::TcpListener, runtime::Runtime};
use tokio_modbus::{
    Address,
    ExceptionCode,
    Quantity,
    Request,
    Response,
    server::tcp::{Server, accept_tcp_connection},
};

use crate::{
    api::modbus::{Error, Transport},
    prelude::*,
};

#[derive(Clone, Default)]
pub struct RegisterBank(Arc<HashMap<Address, u16>>);

impl RegisterBank {
    #[must_use]
    pub fn with_words(mut self, address: Address, words: &[u16]) -> Self {
        let registers = Arc::make_mut(&mut self.0);
        for (offset, word) in (0..).zip(words) {
            registers.insert(address + offset, *word);
        }
        self
    }

    #[must_use]
    pub fn with_i32(self, address: Address, value: i32) -> Self {
        let [b0, b1, b2, b3] = value.to_be_bytes();
        self.with_words(address, &[u16::from_be_bytes([b0, b1]), u16::from_be_bytes([b2, b3])])
    }

    #[must_use]
    pub fn with_text(self, address: Address, n_words: Quantity, text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.resize(usize::from(n_words) * 2, 0);
        let words: Vec<u16> =
            bytes.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]])).collect();
        self.with_words(address, &words)
    }

    pub fn read(&self, address: Address, quantity: Quantity) -> Result<Vec<u16>, ExceptionCode> {
        (0..quantity)
            .map(|offset| {
                address
                    .checked_add(offset)
                    .and_then(|address| self.0.get(&address).copied())
                    .ok_or(ExceptionCode::IllegalDataAddress)
            })
            .collect()
    }
}

impl tokio_modbus::server::Service for RegisterBank {
    type Request = Request<'static>;
    type Response = Response;
    type Exception = ExceptionCode;
    type Future = future::Ready<Result<Self::Response, Self::Exception>>;

    fn call(&self, request: Self::Request) -> Self::Future {
        future::ready(match request {
            Request::ReadHoldingRegisters(address, quantity) => {
                self.read(address, quantity).map(Response::ReadHoldingRegisters)
            }
            _ => Err(ExceptionCode::IllegalFunction),
        })
    }
}

/// Serve the bank over Modbus TCP on a random local port.
///
/// The server lives as long as the returned runtime.
pub fn spawn_server(bank: RegisterBank) -> Result<(Runtime, SocketAddr)> {
    let runtime = Runtime::new()?;
    let listener = runtime.block_on(TcpListener::bind("127.0.0.1:0"))?;
    let address = listener.local_addr()?;
    runtime.spawn(async move {
        let on_connected = move |stream, socket_addr| {
            let bank = bank.clone();
            async move {
                accept_tcp_connection(stream, socket_addr, move |_| Ok(Some(bank.clone())))
            }
        };
        let on_process_error = |error: io::Error| {
            error!("simulated server failure: {error:#}");
        };
        if let Err(error) = Server::new(listener).serve(&on_connected, on_process_error).await {
            error!("simulated server stopped: {error:#}");
        }
    });
    Ok((runtime, address))
}

/// Transport over a register bank, recording every read and optionally failing on some addresses.
#[derive(Default)]
pub struct SimulatedTransport {
    bank: RegisterBank,
    timeouts: HashSet<Address>,
    connected: bool,
    pub reads: Vec<Address>,
    pub n_shutdowns: usize,
}

impl SimulatedTransport {
    pub fn new(bank: RegisterBank) -> Self {
        Self { bank, ..Self::default() }
    }

    /// Respond with a timeout when reading starts at the address.
    #[must_use]
    pub fn with_timeout_at(mut self, address: Address) -> Self {
        self.timeouts.insert(address);
        self
    }
}

impl Transport for SimulatedTransport {
    fn initialize(&mut self) -> Result<(), Error> {
        self.connected = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.connected = false;
        self.n_shutdowns += 1;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn read_holding_registers(
        &mut self,
        address: Address,
        quantity: Quantity,
    ) -> Result<Vec<u16>, Error> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        self.reads.push(address);
        if self.timeouts.contains(&address) {
            return Err(Error::Timeout);
        }
        Ok(self.bank.read(address, quantity)?)
    }
}
