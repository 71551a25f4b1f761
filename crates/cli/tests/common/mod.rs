//! Shared helpers for `labelgen` CLI tests.

#![allow(dead_code, unreachable_pub)]

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assert_cmd::cargo;

/// One PT text line and one 25 mm QR code on 100x80 mm paper.
pub const STANDARD_JOB: &str = r#"{
  "requirement": { "label_size": "100x80mm" },
  "fields": [
    { "field_code": "pt_code", "field_name": "PT", "field_type": "TEXT" },
    { "field_code": "qr", "field_name": "QR", "field_type": "QRCODE" }
  ],
  "values": { "pt_code": "ABC123", "qr": "ABC123" },
  "options": { "qr_size_mm": 25.0 }
}"#;

pub fn labelgen() -> Command {
    Command::new(cargo::cargo_bin!("labelgen"))
}

/// Write `content` to a file in a fresh temp dir.
pub fn write_temp(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    (dir, path)
}

pub fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
