use std::process;
use std::time::Duration;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use socks5_handshake::{Config, Listener, ReplyPolicy, SessionConfig};

/// SOCKS5 handshake server.
#[derive(Debug, Parser)]
#[command(name = "socks5-handshake", version)]
struct Args {
    /// Address to listen on
    ip: String,
    /// Port to listen on
    port: u16,
    /// Give up on a client that has not finished the handshake in time
    #[arg(long, value_name = "SECS")]
    handshake_timeout: Option<u64>,
    /// Answer unsupported commands and address types with SOCKS5 error replies
    #[arg(long)]
    strict_replies: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Config {
        let mut session = SessionConfig::default();
        if args.strict_replies {
            session = session.with_reply_policy(ReplyPolicy::Strict);
        }
        if let Some(secs) = args.handshake_timeout {
            session = session.with_handshake_timeout(Duration::from_secs(secs));
        }
        Config::new(args.ip, args.port).with_session(session)
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config = Config::from(Args::parse());

    let listener = match Listener::bind(&config).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("cannot listen on {}:{}: {}", config.host, config.port, e);
            process::exit(1);
        }
    };

    tokio::select! {
        _ = listener.run() => {}
        _ = tokio::signal::ctrl_c() => info!("server stopped"),
    }
}
