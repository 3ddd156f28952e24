use crate::errors::Error;

pub const SOCKS5_VERSION: u8 = 0x05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Connect = 0x01,
    Bind = 0x02,
    UdpAssociate = 0x03,
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0x01 => Ok(Command::Connect),
            0x02 => Ok(Command::Bind),
            0x03 => Ok(Command::UdpAssociate),
            v => Err(Error::CommandNotSupported(v)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMethod {
    NoAuth = 0x00,
    GSSAPI = 0x01,
    Plain = 0x02,
    NoAccept = 0xff,
}

impl From<AuthMethod> for u8 {
    fn from(method: AuthMethod) -> u8 {
        method as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddrType {
    IPv4 = 0x01,
    DomainName = 0x03,
    IPv6 = 0x04,
}

impl From<AddrType> for u8 {
    fn from(addr_type: AddrType) -> u8 {
        addr_type as u8
    }
}

impl TryFrom<u8> for AddrType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0x01 => Ok(AddrType::IPv4),
            0x03 => Ok(AddrType::DomainName),
            0x04 => Ok(AddrType::IPv6),
            v => Err(Error::AddressTypeNotSupported(v)),
        }
    }
}

/// Reply field of a SOCKS5 reply message.
///
/// ```plain
///   o  X'00' succeeded
///   o  X'01' general SOCKS server failure
///   o  X'02' connection not allowed by ruleset
///   o  X'03' Network unreachable
///   o  X'04' Host unreachable
///   o  X'05' Connection refused
///   o  X'06' TTL expired
///   o  X'07' Command not supported
///   o  X'08' Address type not supported
///   o  X'09' to X'FF' unassigned
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    Succeeded = 0x00,
    GeneralFailure = 0x01,
    NotAllowed = 0x02,
    NetworkUnreachable = 0x03,
    HostUnreachable = 0x04,
    ConnectionRefused = 0x05,
    TtlExpired = 0x06,
    CommandNotSupported = 0x07,
    AddressTypeNotSupported = 0x08,
}

impl From<Reply> for u8 {
    fn from(reply: Reply) -> u8 {
        reply as u8
    }
}
