//! Per-device backup history

use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::cattools::LogEntry;

/// The parts of a log row that say how a backup went
#[derive(Debug, Clone, PartialEq)]
pub struct BackupRecord {
    pub timestamp: DateTime<Local>,
    pub backup: String,
    pub changes: String,
}

impl<'a> From<&'a LogEntry> for BackupRecord {
    fn from(entry: &'a LogEntry) -> BackupRecord {
        BackupRecord {
            timestamp: entry.timestamp,
            backup: entry.backup.clone(),
            changes: entry.changes.clone(),
        }
    }
}

/// Every backup of one device in the window, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceHistory {
    records: Vec<BackupRecord>,
}

impl DeviceHistory {
    pub fn push(&mut self, record: BackupRecord) {
        self.records.push(record);
    }

    /// The most recent backup
    pub fn last(&self) -> Option<&BackupRecord> {
        self.records.last()
    }

    pub fn records(&self) -> &[BackupRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Group entries by device name, keeping log order within each device
pub fn aggregate<I>(entries: I) -> HashMap<String, DeviceHistory>
where
    I: IntoIterator<Item = LogEntry>,
{
    let mut devices: HashMap<String, DeviceHistory> = HashMap::new();
    for entry in entries {
        let record = BackupRecord::from(&entry);
        devices.entry(entry.device).or_default().push(record);
    }
    devices
}
