use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::consts::AddrType;
use crate::errors::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Host {
    Ipv4(Ipv4Addr),
    Domain(String),
    Ipv6(Ipv6Addr),
}

impl Host {
    pub fn addr_type(&self) -> AddrType {
        match self {
            Host::Ipv4(_) => AddrType::IPv4,
            Host::Domain(_) => AddrType::DomainName,
            Host::Ipv6(_) => AddrType::IPv6,
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Ipv4(ip) => ip.fmt(f),
            Host::Domain(domain) => f.write_str(domain),
            Host::Ipv6(ip) => ip.fmt(f),
        }
    }
}

/// Destination requested by the client, as carried on the wire:
///
/// ```plain
/// +------+----------+----------+
/// | ATYP | DST.ADDR | DST.PORT |
/// +------+----------+----------+
/// |  1   | Variable |    2     |
/// +------+----------+----------+
/// ```
///
/// `DST.ADDR` is 4 octets for IPv4, 16 for IPv6, and a length octet followed
/// by that many octets of name for a domain. The port is in network order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    pub host: Host,
    pub port: u16,
}

impl Destination {
    pub fn new(host: Host, port: u16) -> Self {
        Destination { host, port }
    }

    /// `0.0.0.0:0`, the bound address sent in replies that carry none.
    pub fn unspecified() -> Self {
        Destination::new(Host::Ipv4(Ipv4Addr::UNSPECIFIED), 0)
    }

    pub fn addr_type(&self) -> AddrType {
        self.host.addr_type()
    }

    /// Reads `ATYP`, `DST.ADDR` and `DST.PORT`.
    pub async fn read_from<R>(reader: &mut R) -> Result<Destination>
    where
        R: AsyncRead + Unpin,
    {
        let addr_type = AddrType::try_from(reader.read_u8().await?)?;
        Destination::read_with_type(reader, addr_type).await
    }

    /// Reads `DST.ADDR` and `DST.PORT` once `ATYP` has been consumed.
    pub async fn read_with_type<R>(reader: &mut R, addr_type: AddrType) -> Result<Destination>
    where
        R: AsyncRead + Unpin,
    {
        let host = match addr_type {
            AddrType::IPv4 => {
                let mut buf = [0u8; 4];
                reader.read_exact(&mut buf).await?;
                Host::Ipv4(Ipv4Addr::from(buf))
            }
            AddrType::IPv6 => {
                let mut buf = [0u8; 16];
                reader.read_exact(&mut buf).await?;
                Host::Ipv6(Ipv6Addr::from(buf))
            }
            AddrType::DomainName => {
                let len = reader.read_u8().await?;
                let mut buf = vec![0u8; len as usize];
                reader.read_exact(&mut buf).await?;
                Host::Domain(String::from_utf8(buf)?)
            }
        };
        let port = reader.read_u16().await?;
        Ok(Destination { host, port })
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(self.addr_type().into());
        match &self.host {
            Host::Ipv4(ip) => buf.put_slice(&ip.octets()),
            Host::Ipv6(ip) => buf.put_slice(&ip.octets()),
            Host::Domain(domain) => {
                let len = u8::try_from(domain.len()).map_err(|_| Error::DomainTooLong(domain.len()))?;
                buf.put_u8(len);
                buf.put_slice(domain.as_bytes());
            }
        }
        buf.put_u16(self.port);
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(1 + 1 + 255 + 2);
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.host {
            Host::Ipv6(ip) => write!(f, "[{}]:{}", ip, self.port),
            ref host => write!(f, "{}:{}", host, self.port),
        }
    }
}
