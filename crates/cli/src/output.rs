//! Command output.
//!
//! Results go to stdout as pretty JSON so they can be piped into other
//! tools; logs go to stderr.

use std::io::Write;

use serde::Serialize;

/// Write `value` to stdout as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn emit<T: Serialize + ?Sized>(value: &T) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)
}

/// Write a plain status line to stdout.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn line(message: impl std::fmt::Display) -> std::io::Result<()> {
    writeln!(std::io::stdout().lock(), "{message}")
}
