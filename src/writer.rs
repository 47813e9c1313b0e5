//! Semicolon-delimited CSV output.

use crate::model::{Record, HEADERS};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write `records` to `path`, header row first.
pub fn write(records: &[Record], path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_to(records, file).with_context(|| format!("failed to write {}", path.display()))
}

/// Write `records` to any sink. The header row is always present.
pub fn write_to<W: Write>(records: &[Record], sink: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::CRLF)
        .has_headers(false)
        .from_writer(sink);

    writer.write_record(HEADERS)?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;
    Ok(())
}
