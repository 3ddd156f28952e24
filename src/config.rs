use std::time::Duration;

/// How a session answers a request it cannot serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReplyPolicy {
    /// Close without replying when the command or address type is unsupported.
    #[default]
    Silent,
    /// Send the SOCKS5 `Command not supported` / `Address type not supported`
    /// reply before closing.
    Strict,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SessionConfig {
    pub reply_policy: ReplyPolicy,
    /// Upper bound for the whole handshake. `None` waits forever.
    pub handshake_timeout: Option<Duration>,
}

impl SessionConfig {
    pub fn with_reply_policy(mut self, reply_policy: ReplyPolicy) -> Self {
        self.reply_policy = reply_policy;
        self
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = Some(timeout);
        self
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
}

impl Config {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Config {
            host: host.into(),
            port,
            session: SessionConfig::default(),
        }
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    pub fn bind_addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}
