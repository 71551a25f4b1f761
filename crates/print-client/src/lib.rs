//! Print transport for rendered label jobs.
//!
//! Delivers a finished command stream to a device in one send: over raw TCP
//! (port 9100) with [`TcpPrinter`], or to a spool file or character device
//! such as `/dev/usb/lp0` with [`FilePrinter`]. There is no queue and no
//! retry; a failed send is reported to the caller as a [`PrintError`].

#[cfg(feature = "tcp")]
mod addr;
mod config;
mod error;
mod file;
#[cfg(feature = "tcp")]
mod tcp;

#[cfg(feature = "tcp")]
pub use addr::{DEFAULT_PORT, resolve_printer_addr};
pub use config::{PrinterConfig, PrinterTimeouts};
pub use error::PrintError;
pub use file::{FileMode, FilePrinter};
#[cfg(feature = "tcp")]
pub use tcp::TcpPrinter;

// ── Traits ──────────────────────────────────────────────────────────────

/// A destination for rendered label jobs. Every transport implements this.
pub trait Printer: Send {
    /// Deliver `data` to the device in full.
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError>;

    /// Human-readable name of the destination for logs.
    fn describe(&self) -> String;
}

/// Send one job and log the outcome.
///
/// Empty jobs are rejected before touching the transport.
pub fn send_job<P: Printer + ?Sized>(printer: &mut P, job: &[u8]) -> Result<(), PrintError> {
    if job.is_empty() {
        return Err(PrintError::EmptyJob);
    }
    let destination = printer.describe();
    match printer.send_raw(job) {
        Ok(()) => {
            tracing::info!(%destination, bytes = job.len(), "label job sent");
            Ok(())
        }
        Err(err) => {
            tracing::warn!(%destination, %err, "label job failed");
            Err(err)
        }
    }
}
