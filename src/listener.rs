use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use futures::{pin_mut, stream, Stream, StreamExt};
use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};

use crate::config::{Config, SessionConfig};
use crate::socks5::Session;

/// Pause after a failed accept so a persistent error (e.g. EMFILE) does not
/// spin the loop.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Accepts TCP connections and runs one handshake session per connection.
pub struct Listener {
    inner: TcpListener,
    session: SessionConfig,
}

impl Listener {
    pub async fn bind(config: &Config) -> io::Result<Self> {
        let inner = TcpListener::bind(config.bind_addr()).await?;
        Ok(Listener {
            inner,
            session: config.session,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Serves until the process is stopped.
    pub async fn run(self) {
        match self.local_addr() {
            Ok(addr) => info!("SOCKS server running on {}", addr),
            Err(e) => warn!("SOCKS server running on an unknown address: {}", e),
        }
        serve(incoming(self.inner), self.session).await
    }
}

/// Turns a TCP listener into an endless stream of accepted connections.
pub fn incoming(listener: TcpListener) -> impl Stream<Item = io::Result<TcpStream>> {
    stream::unfold(listener, |listener| async move {
        let accepted = listener.accept().await.map(|(stream, peer)| {
            debug!("accepted connection from {}", peer);
            stream
        });
        Some((accepted, listener))
    })
}

/// Spawns a session for every stream the source yields.
///
/// Returns once the source is exhausted; sessions already spawned keep
/// running on their own.
pub async fn serve<I, S>(incoming: I, config: SessionConfig)
where
    I: Stream<Item = io::Result<S>>,
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    pin_mut!(incoming);
    let mut next_id: u64 = 0;
    while let Some(accepted) = incoming.next().await {
        let stream = match accepted {
            Ok(stream) => stream,
            Err(e) => {
                warn!("accept failed: {}", e);
                tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                continue;
            }
        };
        next_id += 1;
        let id = next_id;
        tokio::spawn(async move {
            info!("[{}] new client connected", id);
            let mut session = Session::with_config(stream, config);
            match session.negotiate().await {
                Ok(destination) => info!("[{}] negotiation complete: {}", id, destination),
                Err(e) => warn!("[{}] {}", id, e),
            }
        });
    }
}
