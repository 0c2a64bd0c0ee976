use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;

use crate::error::Result;
use crate::types::{LineRecord, Timestamp};

/// Raw row exactly as it appears in the line table.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct RawRow {
    commit: String,
    file: String,
    #[serde(rename = "type")]
    file_type: String,
    line: String,
    depth: String,
    length: String,
    author: String,
    datetime: String,
    date: String,
    timezone: String,
}

/// Load the line table asynchronously.
///
/// The file is read with `tokio::fs` and parsed on a blocking task; nothing is
/// rendered until this resolves.
pub async fn load_line_records_async(path: impl AsRef<Path>) -> Result<Vec<LineRecord>> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let bytes = tokio::fs::read(&path).await?;

    let records = spawn_blocking(move || parse_line_records(bytes.as_slice())).await??;
    log::info!("Loaded {} line records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse every row of a line table. Rows are never dropped; values that fail
/// to coerce are kept as `None`.
pub fn parse_line_records<R: Read>(reader: R) -> Result<Vec<LineRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut malformed = 0usize;

    for row in csv_reader.deserialize::<RawRow>() {
        let record = parse_row(row?);
        if record.line.is_none()
            || record.depth.is_none()
            || record.length.is_none()
            || record.datetime.is_none()
        {
            malformed += 1;
        }
        records.push(record);
    }

    if malformed > 0 {
        log::warn!("{} rows carry values that could not be coerced", malformed);
    }

    Ok(records)
}

fn parse_row(row: RawRow) -> LineRecord {
    let date = parse_midnight(&row.date, &row.timezone);
    let datetime = if row.datetime.is_empty() {
        date
    } else {
        parse_timestamp(&row.datetime)
    };

    LineRecord {
        commit: row.commit,
        file: row.file,
        file_type: row.file_type,
        line: coerce_int(&row.line),
        depth: coerce_int(&row.depth),
        length: coerce_int(&row.length),
        author: row.author,
        datetime,
        date,
    }
}

/// Write records back out in the line-table layout.
pub fn write_line_records<W: Write>(records: &[LineRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(to_row(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn to_row(record: &LineRecord) -> RawRow {
    let number = |n: Option<u32>| n.map(|v| v.to_string()).unwrap_or_else(|| "NaN".to_string());
    let stamp = record.datetime.or(record.date);

    RawRow {
        commit: record.commit.clone(),
        file: record.file.clone(),
        file_type: record.file_type.clone(),
        line: number(record.line),
        depth: number(record.depth),
        length: number(record.length),
        author: record.author.clone(),
        datetime: record
            .datetime
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
            .unwrap_or_default(),
        date: stamp
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        timezone: stamp
            .map(|dt| dt.format("%:z").to_string())
            .unwrap_or_default(),
    }
}

/// Numeric coercion of one cell: blank is zero, anything that is not a
/// non-negative whole number is `None`.
pub fn coerce_int(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0);
    }
    if let Ok(n) = value.parse::<u32>() {
        return Some(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => {
            Some(f as u32)
        }
        _ => None,
    }
}

/// Parse a commit timestamp as written by git tooling.
pub fn parse_timestamp(value: &str) -> Timestamp {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S%:z",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
}

/// Combine a calendar date, a literal midnight and a UTC offset.
pub fn parse_midnight(date: &str, timezone: &str) -> Timestamp {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    let timezone = match timezone.trim() {
        "" | "Z" => "+00:00",
        tz => tz,
    };
    let combined = format!("{}T00:00{}", date, timezone);
    DateTime::<FixedOffset>::parse_from_str(&combined, "%Y-%m-%dT%H:%M%:z")
        .or_else(|_| DateTime::<FixedOffset>::parse_from_str(&combined, "%Y-%m-%dT%H:%M%z"))
        .ok()
}
