use std::sync::Once;

use log::LevelFilter;

use crate::addr::{Destination, Host};
use crate::consts::AddrType;
use crate::errors::Error;

static INIT: Once = Once::new();

pub(crate) fn init() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Trace)
            .init()
    })
}

async fn decode(bytes: &[u8]) -> Destination {
    let mut reader = bytes;
    let destination = Destination::read_from(&mut reader).await.unwrap();
    assert!(reader.is_empty(), "{} bytes left over", reader.len());
    destination
}

#[tokio::test]
async fn ipv4_target_addr() {
    let target = Destination::new(Host::Ipv4("234.123.23.42".parse().unwrap()), 1443);
    assert_eq!(target.addr_type(), AddrType::IPv4);
    let bytes = target.to_bytes().unwrap();
    assert_eq!(&bytes[..], &[1, 234, 123, 23, 42, 5, 163]);

    let decoded = decode(&bytes).await;
    assert_eq!(decoded.host.to_string(), "234.123.23.42");
    assert_eq!(decoded.port, 1443);
}

#[tokio::test]
async fn ipv6_target_addr() {
    let target = Destination::new(
        Host::Ipv6("2001:0db8:11a3:09d7:1f34:8a2e:07a0:765d".parse().unwrap()),
        443,
    );
    assert_eq!(target.addr_type(), AddrType::IPv6);
    let bytes = target.to_bytes().unwrap();
    assert_eq!(
        &bytes[..],
        &[4, 32, 1, 13, 184, 17, 163, 9, 215, 31, 52, 138, 46, 7, 160, 118, 93, 1, 187]
    );

    let decoded = decode(&bytes).await;
    assert_eq!(decoded.host.to_string(), "2001:db8:11a3:9d7:1f34:8a2e:7a0:765d");
    assert_eq!(decoded.port, 443);
    assert_eq!(decoded, target);
}

#[tokio::test]
async fn domain_target_addr() {
    let target = Destination::new(Host::Domain("api.telegram.org".to_string()), 443);
    assert_eq!(target.addr_type(), AddrType::DomainName);
    let bytes = target.to_bytes().unwrap();
    assert_eq!(
        &bytes[..],
        &[
            3, 16, 97, 112, 105, 46, 116, 101, 108, 101, 103, 114, 97, 109, 46, 111, 114, 103, 1,
            187
        ]
    );

    let decoded = decode(&bytes).await;
    assert_eq!(decoded.host.to_string(), "api.telegram.org");
    assert_eq!(decoded.port, 443);
}

#[tokio::test]
async fn non_ascii_domain_target_addr() {
    let target = Destination::new(Host::Domain("пример.рф".to_string()), 8080);
    let decoded = decode(&target.to_bytes().unwrap()).await;
    assert_eq!(decoded.host.to_string(), "пример.рф");
    assert_eq!(decoded.port, 8080);
}

#[tokio::test]
async fn empty_domain_target_addr() {
    let decoded = decode(&[3, 0, 0, 80]).await;
    assert_eq!(decoded.host, Host::Domain(String::new()));
    assert_eq!(decoded.port, 80);
}

#[test]
fn domain_too_long() {
    let target = Destination::new(Host::Domain("a".repeat(256)), 80);
    assert!(matches!(target.to_bytes(), Err(Error::DomainTooLong(256))));
    let target = Destination::new(Host::Domain("a".repeat(255)), 80);
    assert_eq!(target.to_bytes().unwrap().len(), 1 + 1 + 255 + 2);
}

#[tokio::test]
async fn unknown_addr_type() {
    let mut reader: &[u8] = &[2, 127, 0, 0, 1, 0, 80];
    let err = Destination::read_from(&mut reader).await.unwrap_err();
    assert!(matches!(err, Error::AddressTypeNotSupported(2)));
}

#[test]
fn display_target_addr() {
    let v4 = Destination::new(Host::Ipv4("127.0.0.1".parse().unwrap()), 80);
    let v6 = Destination::new(Host::Ipv6("::1".parse().unwrap()), 443);
    let domain = Destination::new(Host::Domain("a.com".to_string()), 443);
    assert_eq!(v4.to_string(), "127.0.0.1:80");
    assert_eq!(v6.to_string(), "[::1]:443");
    assert_eq!(domain.to_string(), "a.com:443");
    assert_eq!(Destination::unspecified().to_string(), "0.0.0.0:0");
}
