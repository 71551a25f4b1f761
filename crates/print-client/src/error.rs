//! Typed errors for the print transport.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Why a job could not be delivered.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    // -- Connection --
    /// The printer refused the connection (port closed).
    #[error("connection refused: {addr}")]
    ConnectionRefused {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The connection was not established within the connect timeout.
    #[error("connection timed out: {addr} ({timeout:?})")]
    ConnectionTimeout {
        /// The address that was attempted.
        addr: String,
        /// The timeout that elapsed.
        timeout: Duration,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The connection failed for another reason.
    #[error("connection failed: {addr}")]
    ConnectionFailed {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    // -- Address --
    /// Name resolution produced no address.
    #[error("no address found for printer: {0}")]
    NoAddressFound(String),

    // -- Output --
    /// The file or device could not be opened.
    #[error("cannot open {}", path.display())]
    OpenFailed {
        /// The path that was attempted.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Writing the job failed part-way.
    #[error("write failed: {0}")]
    WriteFailed(#[source] io::Error),

    /// The job contained no bytes.
    #[error("refusing to send an empty job")]
    EmptyJob,
}
