//! Printer address parsing.
//!
//! Accepts `IP`, `IP:PORT`, `[IPv6]:PORT`, `host` and `host:PORT`. A
//! missing port means the raw print port 9100.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use crate::PrintError;

/// Raw print port used when the address names none.
pub const DEFAULT_PORT: u16 = 9100;

/// Resolve a printer address to the first matching socket address.
pub fn resolve_printer_addr(input: &str) -> Result<SocketAddr, PrintError> {
    let input = input.trim();
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }
    // Only fall back to the default port when the input names no port at all;
    // "host:abc" is an error, not "host:abc" on 9100.
    let lookup = if has_port(input) {
        input.to_socket_addrs()
    } else {
        (input, DEFAULT_PORT).to_socket_addrs()
    };
    lookup
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| PrintError::NoAddressFound(input.to_string()))
}

fn has_port(input: &str) -> bool {
    input.rsplit_once(':').is_some_and(|(host, _)| !host.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_with_and_without_port() {
        let addr = resolve_printer_addr("192.168.1.55:6101").unwrap();
        assert_eq!(addr.ip().to_string(), "192.168.1.55");
        assert_eq!(addr.port(), 6101);

        let addr = resolve_printer_addr("192.168.1.55").unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn ipv6_forms() {
        let addr = resolve_printer_addr("[::1]:9200").unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9200);

        let addr = resolve_printer_addr("::1").unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn hostname_defaults_port() {
        let addr = resolve_printer_addr("localhost").unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), DEFAULT_PORT);

        let addr = resolve_printer_addr(" localhost:9101 ").unwrap();
        assert_eq!(addr.port(), 9101);
    }

    #[test]
    fn unresolvable_input_is_reported_verbatim() {
        for input in ["no-such-host.invalid", "not a valid address!!!"] {
            match resolve_printer_addr(input) {
                Err(PrintError::NoAddressFound(s)) => assert_eq!(s, input),
                other => panic!("expected NoAddressFound, got {other:?}"),
            }
        }
    }
}
