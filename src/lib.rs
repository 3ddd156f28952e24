//! Server side of the SOCKS5 handshake.
//!
//! A [`Session`] negotiates one connection: it selects the
//! `NO AUTHENTICATION REQUIRED` method, accepts only `CONNECT`, and decodes
//! the destination into a [`Destination`]. Relaying traffic to that
//! destination is left to the caller, which gets the stream back through
//! [`Session::into_inner`].
//!
//! [`Listener`] and [`serve`] run one session per accepted connection.

pub mod addr;
pub mod config;
pub mod consts;
pub mod errors;
pub mod listener;
pub mod socks5;

#[cfg(test)]
mod tests;

pub use addr::{Destination, Host};
pub use config::{Config, ReplyPolicy, SessionConfig};
pub use errors::{Error, NegotiationError, Result};
pub use listener::{incoming, serve, Listener};
pub use socks5::{Session, State};
