//! Raw TCP transport (JetDirect port 9100).

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};

use crate::addr::resolve_printer_addr;
use crate::{PrintError, Printer, PrinterConfig};

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(60);

/// A connected network label printer.
///
/// The connection is opened by [`TcpPrinter::connect`] and shut down on
/// drop. Jobs are written as-is; the printer sends nothing back.
#[derive(Debug)]
pub struct TcpPrinter {
    stream: TcpStream,
    addr: SocketAddr,
}

impl TcpPrinter {
    /// Resolve `addr` (see [`resolve_printer_addr`]) and connect within the
    /// configured connect timeout.
    pub fn connect(addr: &str, config: &PrinterConfig) -> Result<Self, PrintError> {
        let addr = resolve_printer_addr(addr)?;
        tracing::debug!(%addr, timeout = ?config.timeouts.connect, "connecting to printer");
        let stream = TcpStream::connect_timeout(&addr, config.timeouts.connect)
            .map_err(|source| connect_error(addr, config.timeouts.connect, source))?;
        configure_stream(&stream, config).map_err(|source| PrintError::ConnectionFailed {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self { stream, addr })
    }

    /// The resolved address of the printer.
    pub fn remote_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for TcpPrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        self.stream.write_all(data).map_err(PrintError::WriteFailed)?;
        self.stream.flush().map_err(PrintError::WriteFailed)
    }

    fn describe(&self) -> String {
        format!("tcp://{}", self.addr)
    }
}

impl Drop for TcpPrinter {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

fn connect_error(addr: SocketAddr, timeout: Duration, source: io::Error) -> PrintError {
    let addr = addr.to_string();
    match source.kind() {
        io::ErrorKind::ConnectionRefused => PrintError::ConnectionRefused { addr, source },
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => PrintError::ConnectionTimeout {
            addr,
            timeout,
            source,
        },
        _ => PrintError::ConnectionFailed { addr, source },
    }
}

fn configure_stream(stream: &TcpStream, config: &PrinterConfig) -> io::Result<()> {
    stream.set_nodelay(true)?;
    stream.set_write_timeout(Some(config.timeouts.write))?;

    let keepalive = TcpKeepalive::new().with_time(KEEPALIVE_INTERVAL);
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    let keepalive = keepalive.with_interval(KEEPALIVE_INTERVAL);
    SockRef::from(stream).set_tcp_keepalive(&keepalive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_errors_are_classified() {
        let addr: SocketAddr = "127.0.0.1:9100".parse().unwrap();
        let timeout = Duration::from_secs(1);
        assert!(matches!(
            connect_error(addr, timeout, io::ErrorKind::ConnectionRefused.into()),
            PrintError::ConnectionRefused { .. }
        ));
        assert!(matches!(
            connect_error(addr, timeout, io::ErrorKind::TimedOut.into()),
            PrintError::ConnectionTimeout { .. }
        ));
        assert!(matches!(
            connect_error(addr, timeout, io::ErrorKind::PermissionDenied.into()),
            PrintError::ConnectionFailed { .. }
        ));
    }
}
