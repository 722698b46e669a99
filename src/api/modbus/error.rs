use std::io;

use tokio_modbus::ExceptionCode;

use crate::api::modbus::Value;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the client is not connected")]
    NotConnected,

    #[error("failed to start the I/O runtime")]
    Runtime(#[source] io::Error),

    #[error("failed to resolve `{endpoint}`")]
    Resolve {
        endpoint: String,

        #[source]
        source: io::Error,
    },

    #[error("`{0}` did not resolve to any address")]
    Unresolved(String),

    #[error("failed to connect to `{endpoint}`")]
    Connect {
        endpoint: String,

        #[source]
        source: io::Error,
    },

    #[error("timed out waiting for the response")]
    Timeout,

    #[error("the device responded with an exception: {0:?}")]
    Exception(ExceptionCode),

    #[error("read {actual} words while expected {expected}")]
    UnexpectedLength { expected: usize, actual: usize },

    #[error("expected {expected} value, got `{actual:?}`")]
    UnexpectedValue { expected: &'static str, actual: Value },

    #[error("transport failure")]
    Transport(#[source] tokio_modbus::Error),
}

impl From<tokio_modbus::Error> for Error {
    fn from(error: tokio_modbus::Error) -> Self {
        match error {
            tokio_modbus::Error::Transport(error) if error.kind() == io::ErrorKind::TimedOut => {
                Self::Timeout
            }
            error => Self::Transport(error),
        }
    }
}

impl From<ExceptionCode> for Error {
    fn from(code: ExceptionCode) -> Self {
        Self::Exception(code)
    }
}
