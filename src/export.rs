//! CSV export of the records currently on display.

use crate::record::LogRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 8] = [
    "timestamp",
    "level",
    "service",
    "message",
    "host",
    "trace_id",
    "span_id",
    "content",
];

/// `dynatrace_logs_YYYYMMDD_HHMMSS.csv`
pub fn export_filename(at: DateTime<Local>) -> String {
    format!("dynatrace_logs_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

pub fn write_csv<W: Write>(writer: W, records: &[LogRecord]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for r in records {
        csv.write_record([
            r.formatted_timestamp().as_str(),
            r.level.as_str(),
            r.service.as_str(),
            r.message.as_str(),
            r.host.as_str(),
            r.trace_id.as_str(),
            r.span_id.as_str(),
            r.content.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write `records` to a timestamped file in `dir` and return its path.
pub fn export_to_dir(dir: &Path, records: &[LogRecord]) -> Result<PathBuf> {
    let path = dir.join(export_filename(Local::now()));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, records).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
