//! Output formatting for the command-line tools.
//!
//! Supports pretty JSON printing and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::reading::Reading;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut out: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Appends readings as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist. Returns the
/// number of rows written.
pub fn append_readings(path: &str, readings: &[Reading]) -> Result<usize> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = readings.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for reading in readings {
        writer.serialize(reading)?;
    }
    writer.flush()?;

    Ok(readings.len())
}
