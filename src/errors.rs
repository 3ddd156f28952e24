use std::time::Duration;

use thiserror::Error;

use crate::socks5::State;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("SOCKS{0} is not supported")]
    NotSupportedSocksVersion(u8),
    #[error("no acceptable authentication method offered")]
    MethodNotAccept,
    #[error("command {0:#04x} is not supported")]
    CommandNotSupported(u8),
    #[error("address type {0:#04x} is not supported")]
    AddressTypeNotSupported(u8),
    #[error("domain name is not valid UTF-8: {0}")]
    InvalidDomain(#[from] std::string::FromUtf8Error),
    #[error("domain name of {0} bytes does not fit in a SOCKS5 address")]
    DomainTooLong(usize),
    #[error("handshake did not finish within {0:?}")]
    Timeout(Duration),
    #[error("session already finished")]
    SessionFinished,
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// A session failure together with the state the session was in.
#[derive(Debug, Error)]
#[error("negotiation failed while {during}: {source}")]
pub struct NegotiationError {
    pub during: State,
    pub source: Error,
}
