//! Read the CatTools running-config backup log and judge every device in it
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`log::fetch`] reads the last [`WINDOW_ROWS`] rows of [`LOG_PATH`]
//! 2. [`aggregate`] groups them into one [`DeviceHistory`] per device
//! 3. [`evaluate`] judges the newest record of every device, in device name
//!    order, into one [`Evaluation`]
//! 4. [`Report`] turns that into the line and exit code a monitoring system
//!    expects

pub mod evaluate;
pub mod history;
pub mod log;
pub mod report;

pub use self::evaluate::{evaluate, Evaluation, Policy, Verdict};
pub use self::history::{aggregate, BackupRecord, DeviceHistory};
pub use self::log::LogEntry;
pub use self::report::Report;

/// Where CatTools' SFTP root exposes the running-config backup log
pub const LOG_PATH: &str = "/Device.Backup.Running Config.txt";

/// How many of the most recent log rows are considered
pub const WINDOW_ROWS: usize = 100;

/// Backup outcome CatTools writes for a successful backup
pub const BACKUP_OK: &str = "OK";

/// Change marker CatTools writes when the running config differs from the
/// previous capture
pub const CONFIG_CHANGED: &str = "Changed!";
