//! The CatTools backup log and how to read it
//!
//! Every backup run appends one line per device, tab separated, no header:
//!
//! ```plain
//! 2024/03/01 02:00:13	Core	core-sw-01	10.0.0.2	Cisco.Switch.IOS	OK	Changed!	<html report>	<txt report>
//! ```

use std::collections::VecDeque;
use std::io::Read;
use std::path::Path;
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use csv::StringRecord;
use serde::{Deserialize, Deserializer};
use ssh2::Session;
use tracing::{debug, warn};

use crate::cattools::{LOG_PATH, WINDOW_ROWS};
use crate::error::FetchError;

/// How CatTools writes times, in the timezone of the machine it runs on
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const COLUMNS: usize = 9;

/// One row of the log
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogEntry {
    /// Unparseable times become the Unix epoch, which makes the device stale
    #[serde(deserialize_with = "from_local_timestamp")]
    pub timestamp: DateTime<Local>,
    pub group: String,
    pub device: String,
    pub address: String,
    pub device_type: String,
    /// `OK` or whatever error CatTools reported
    pub backup: String,
    /// `Changed!` if the config differs from the last backup
    pub changes: String,
    pub html_report: String,
    pub txt_report: String,
}

/// Read the log over SFTP and parse its last [`WINDOW_ROWS`] rows
///
/// The sftp channel and the file are closed before this returns.
pub fn fetch(session: &Session) -> Result<Vec<LogEntry>, FetchError> {
    let sftp = session.sftp().map_err(FetchError::Sftp)?;
    let mut file = sftp.open(Path::new(LOG_PATH)).map_err(FetchError::Open)?;
    let mut raw = Vec::new();
    file.read_to_end(&mut raw)?;
    debug!(bytes = raw.len(), path = LOG_PATH, "read backup log");
    Ok(parse(&String::from_utf8_lossy(&raw)))
}

/// Parse the trailing window of a log
///
/// Only the last [`WINDOW_ROWS`] rows are kept, in file order. Rows in that
/// window that are too short or have no device name are skipped.
pub fn parse(contents: &str) -> Vec<LogEntry> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut window = VecDeque::with_capacity(WINDOW_ROWS);
    let mut rows = 0;
    for record in reader.records() {
        match record {
            Ok(record) => {
                rows += 1;
                if window.len() == WINDOW_ROWS {
                    window.pop_front();
                }
                window.push_back(record);
            }
            Err(e) => warn!(error = %e, "unreadable log row"),
        }
    }
    debug!(rows, window = window.len(), "windowed backup log");

    window.iter().filter_map(to_entry).collect()
}

fn to_entry(record: &StringRecord) -> Option<LogEntry> {
    let line = record.position().map_or(0, |p| p.line());
    if record.len() < COLUMNS {
        warn!(line, columns = record.len(), "skipping log row with too few columns");
        return None;
    }
    let record: StringRecord = record.iter().take(COLUMNS).collect();
    match record.deserialize::<LogEntry>(None) {
        Ok(ref entry) if entry.device.is_empty() => {
            warn!(line, "skipping log row without a device name");
            None
        }
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!(line, error = %e, "skipping malformed log row");
            None
        }
    }
}

/// Parse a CatTools timestamp as local time, or the Unix epoch if it can't be
pub fn parse_timestamp(raw: &str) -> DateTime<Local> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .unwrap_or_else(|| {
            warn!(timestamp = raw, "unparseable timestamp, treating it as the epoch");
            DateTime::from(UNIX_EPOCH)
        })
}

fn from_local_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_timestamp(&raw))
}
