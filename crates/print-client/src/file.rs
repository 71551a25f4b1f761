//! File and character-device transport.
//!
//! Covers spool files and devices that accept raw jobs through the
//! filesystem, for example `/dev/usb/lp0` on Linux.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{PrintError, Printer};

/// How [`FilePrinter`] opens its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// Replace any existing content. Devices ignore truncation.
    #[default]
    Truncate,
    /// Append each job after existing content.
    Append,
}

/// Writes jobs to a file or device path.
///
/// The path is opened for each job so a device that is unplugged between
/// jobs is reported on the next send rather than at construction.
#[derive(Debug, Clone)]
pub struct FilePrinter {
    path: PathBuf,
    mode: FileMode,
}

impl FilePrinter {
    /// Printer writing to `path` in `mode`.
    pub fn new(path: impl Into<PathBuf>, mode: FileMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    /// The destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<File, PrintError> {
        let mut options = OpenOptions::new();
        match self.mode {
            FileMode::Truncate => options.write(true).create(true).truncate(true),
            FileMode::Append => options.append(true).create(true),
        };
        options.open(&self.path).map_err(|source| PrintError::OpenFailed {
            path: self.path.clone(),
            source,
        })
    }
}

impl Printer for FilePrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        let mut file = self.open()?;
        file.write_all(data).map_err(PrintError::WriteFailed)?;
        file.flush().map_err(PrintError::WriteFailed)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
