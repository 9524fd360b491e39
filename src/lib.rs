//! Check CatTools configuration backups from Sensu or Nagios
//!
//! CatTools writes one tab-separated line per device per backup run to
//! `Device.Backup.Running Config.txt`. The `check-cattools` binary reads the
//! tail of that log over SFTP and reports, for every device it finds, whether
//! the most recent backup is recent, successful and unchanged.
//!
//! The pieces are usable on their own:
//!
//! ```rust,no_run
//! use chrono::Local;
//! use cattools_plugins::cattools::{aggregate, evaluate, log, Policy, Report};
//! use cattools_plugins::ssh::{self, Credentials, Target};
//!
//! # fn main() -> Result<(), cattools_plugins::error::CheckError> {
//! let target = Target::new("backup-host", 22, "monitor");
//! let credentials = Credentials::load("~/.ssh/id_rsa", None);
//! let session = ssh::connect(&target, &credentials)?;
//! let histories = aggregate(log::fetch(&session)?);
//! let report = Report::from(evaluate(&histories, &Policy::new(1), Local::now()));
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```
//!
//! See the [scripts](scripts/index.html) module for the command line
//! interface.

use std::fmt;
use std::process;

pub mod cattools;
pub mod error;
pub mod logging;
pub mod scripts;
pub mod ssh;

/// All possible exit statuses for a check
///
/// `Unknown` is deliberately not ordered against the others: it is the
/// state a check is in before it has learned anything, not a severity that
/// sits above `Critical`.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// The process exit code monitoring systems expect for this status
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    /// Exit the process with the code for this status
    pub fn exit(self) -> ! {
        process::exit(self.code())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        write!(f, "{}", msg)
    }
}
