use std::collections::BTreeSet;
use std::fmt;

use bytes::{BufMut, BytesMut};
use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::addr::Destination;
use crate::config::{ReplyPolicy, SessionConfig};
use crate::consts::{AddrType, AuthMethod, Command, Reply, SOCKS5_VERSION};
use crate::errors::{Error, NegotiationError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    AwaitingAuthMethods,
    AwaitingCommand,
    AwaitingAddress,
    Complete,
    Failed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            State::AwaitingAuthMethods => "awaiting authentication methods",
            State::AwaitingCommand => "awaiting command",
            State::AwaitingAddress => "awaiting address",
            State::Complete => "complete",
            State::Failed => "failed",
        };
        f.write_str(text)
    }
}

/// Server side of one SOCKS5 handshake.
///
/// The session owns the stream until it is dropped or released with
/// [`Session::into_inner`]. It never sends the final CONNECT reply: the
/// bound address belongs to whoever relays the connection.
pub struct Session<S> {
    stream: S,
    state: State,
    config: SessionConfig,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Session::with_config(stream, SessionConfig::default())
    }

    pub fn with_config(stream: S, config: SessionConfig) -> Self {
        Session {
            stream,
            state: State::AwaitingAuthMethods,
            config,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Runs method, command and address negotiation in order.
    ///
    /// The first failing step ends the session in [`State::Failed`]; nothing
    /// more is read from the stream afterwards.
    pub async fn negotiate(&mut self) -> std::result::Result<Destination, NegotiationError> {
        if self.state != State::AwaitingAuthMethods {
            return Err(NegotiationError {
                during: self.state,
                source: Error::SessionFinished,
            });
        }

        let result = match self.config.handshake_timeout {
            Some(limit) => tokio::time::timeout(limit, self.run())
                .await
                .unwrap_or(Err(Error::Timeout(limit))),
            None => self.run().await,
        };

        match result {
            Ok(destination) => {
                self.advance(State::Complete);
                Ok(destination)
            }
            Err(source) => {
                let during = self.state;
                self.advance(State::Failed);
                Err(NegotiationError { during, source })
            }
        }
    }

    async fn run(&mut self) -> Result<Destination> {
        self.negotiate_auth_method().await?;
        self.advance(State::AwaitingCommand);
        self.negotiate_command().await?;
        self.advance(State::AwaitingAddress);
        self.negotiate_address().await
    }

    fn advance(&mut self, next: State) {
        trace!("session state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Method selection
    ///
    /// ```plain
    /// +----+----------+----------+        +----+--------+
    /// |VER | NMETHODS | METHODS  |        |VER | METHOD |
    /// +----+----------+----------+  --->  +----+--------+
    /// | 1  |    1     | 1 to 255 |        | 1  |   1    |
    /// +----+----------+----------+        +----+--------+
    /// ```
    ///
    /// Only `NO AUTHENTICATION REQUIRED` is selectable; anything else is
    /// answered with `X'FF'`. A foreign version gets no answer at all.
    async fn negotiate_auth_method(&mut self) -> Result<()> {
        let mut buf = [0u8; 2];
        self.stream.read_exact(&mut buf).await?;
        let [ver, nmethods] = buf;
        if ver != SOCKS5_VERSION {
            return Err(Error::NotSupportedSocksVersion(ver));
        }

        let mut methods = vec![0u8; nmethods as usize];
        self.stream.read_exact(&mut methods).await?;
        let offered: BTreeSet<u8> = methods.into_iter().collect();
        debug!("offered authentication methods: {:?}", offered);

        let selected = if offered.contains(&u8::from(AuthMethod::NoAuth)) {
            AuthMethod::NoAuth
        } else {
            AuthMethod::NoAccept
        };
        self.stream
            .write_all(&[SOCKS5_VERSION, selected.into()])
            .await?;
        self.stream.flush().await?;

        match selected {
            AuthMethod::NoAuth => Ok(()),
            _ => Err(Error::MethodNotAccept),
        }
    }

    /// Request header up to the address
    ///
    /// ```plain
    /// +----+-----+-------+
    /// |VER | CMD |  RSV  |
    /// +----+-----+-------+
    /// | 1  |  1  | X'00' |
    /// +----+-----+-------+
    /// ```
    ///
    /// `VER` and `RSV` are read but not checked.
    async fn negotiate_command(&mut self) -> Result<()> {
        let mut buf = [0u8; 3];
        self.stream.read_exact(&mut buf).await?;
        let [_ver, cmd, _rsv] = buf;
        match Command::try_from(cmd) {
            Ok(Command::Connect) => Ok(()),
            Ok(_) | Err(_) => {
                self.reject(Reply::CommandNotSupported).await;
                Err(Error::CommandNotSupported(cmd))
            }
        }
    }

    async fn negotiate_address(&mut self) -> Result<Destination> {
        let atyp = self.stream.read_u8().await?;
        let addr_type = match AddrType::try_from(atyp) {
            Ok(addr_type) => addr_type,
            Err(err) => {
                self.reject(Reply::AddressTypeNotSupported).await;
                return Err(err);
            }
        };
        debug!("address type: {:?}", addr_type);

        let destination = Destination::read_with_type(&mut self.stream, addr_type).await?;
        debug!("destination: {}", destination);
        Ok(destination)
    }

    /// Sends an error reply when the policy asks for one. A reply that cannot
    /// be written is only logged; the caller reports the protocol error.
    async fn reject(&mut self, reply: Reply) {
        if self.config.reply_policy != ReplyPolicy::Strict {
            return;
        }
        if let Err(e) = self.send_reply(reply).await {
            debug!("could not send {:?} reply: {}", reply, e);
        }
    }

    /// Reply
    ///
    /// ```plain
    /// +----+-----+-------+------+----------+----------+
    /// |VER | REP |  RSV  | ATYP | BND.ADDR | BND.PORT |
    /// +----+-----+-------+------+----------+----------+
    /// | 1  |  1  | X'00' |  1   | Variable |    2     |
    /// +----+-----+-------+------+----------+----------+
    /// ```
    async fn send_reply(&mut self, reply: Reply) -> Result<()> {
        let mut buf = BytesMut::with_capacity(10);
        buf.put_u8(SOCKS5_VERSION);
        buf.put_u8(reply.into());
        buf.put_u8(0x00);
        Destination::unspecified().encode(&mut buf)?;
        self.stream.write_all(&buf).await?;
        self.stream.flush().await?;
        Ok(())
    }
}
