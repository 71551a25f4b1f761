//! Transport configuration.

use std::time::Duration;

/// Printer connection settings.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Connect and write timeouts.
    pub timeouts: PrinterTimeouts,
}

impl PrinterConfig {
    /// Config with the given timeouts.
    pub fn with_timeouts(timeouts: PrinterTimeouts) -> Self {
        Self { timeouts }
    }
}

/// Timeouts for one send.
///
/// Defaults suit LAN-attached label printers: 5 s to connect, 30 s to
/// write a job.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterTimeouts {
    /// Maximum time to establish the connection.
    pub connect: Duration,
    /// Maximum time for a write to complete.
    pub write: Duration,
}

impl PrinterTimeouts {
    /// Timeouts with explicit values.
    pub fn new(connect: Duration, write: Duration) -> Self {
        Self { connect, write }
    }
}

impl Default for PrinterTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            write: Duration::from_secs(30),
        }
    }
}
