//! Decide how healthy the backups are
//!
//! Only the newest record of each device counts. The first rule that
//! matches decides the device's verdict:
//!
//! 1. older than the interval plus an hour of grace: critical
//! 2. the backup itself failed: critical
//! 3. the config changed: noted, status untouched
//! 4. otherwise: ok, which only replaces a status that is still unknown
//!
//! Devices are judged in name order, so the same log always gives the same
//! status and the same message.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Local};
use itertools::Itertools;
use tracing::debug;

use crate::cattools::{BackupRecord, DeviceHistory, BACKUP_OK, CONFIG_CHANGED};
use crate::Status;

const GRACE_SECONDS: i64 = 3600;
const SECONDS_PER_DAY: i64 = 86_400;

/// How old a backup may get
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    pub interval_days: u32,
}

impl Policy {
    pub fn new(interval_days: u32) -> Policy {
        Policy { interval_days }
    }

    /// The interval plus an hour, so a backup that runs a little late
    /// doesn't alert
    pub fn max_age(&self) -> Duration {
        Duration::seconds(i64::from(self.interval_days) * SECONDS_PER_DAY + GRACE_SECONDS)
    }
}

/// What became of one device
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Stale,
    /// Carries the outcome CatTools reported
    BackupFailed(String),
    Changed,
    Healthy,
}

impl Verdict {
    pub fn judge(record: &BackupRecord, policy: &Policy, now: DateTime<Local>) -> Verdict {
        if now.signed_duration_since(record.timestamp) > policy.max_age() {
            Verdict::Stale
        } else if record.backup != BACKUP_OK {
            Verdict::BackupFailed(record.backup.clone())
        } else if record.changes == CONFIG_CHANGED {
            Verdict::Changed
        } else {
            Verdict::Healthy
        }
    }

    pub fn fragment(&self, device: &str, policy: &Policy) -> String {
        match *self {
            Verdict::Stale => format!(
                "{} not backuped for more than {} day(s)",
                device, policy.interval_days
            ),
            Verdict::BackupFailed(ref outcome) => format!("{} backup error: {}", device, outcome),
            Verdict::Changed => format!("{} config was changed", device),
            Verdict::Healthy => format!("{} OK", device),
        }
    }
}

/// The running result of a check
///
/// Starts out `Unknown` with no message, and is passed through every device
/// in turn by [`evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    status: Status,
    fragments: Vec<String>,
}

impl Default for Evaluation {
    fn default() -> Evaluation {
        Evaluation {
            status: Status::Unknown,
            fragments: Vec::new(),
        }
    }
}

impl Evaluation {
    pub fn new() -> Evaluation {
        Evaluation::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Every fragment, in the order they were recorded, joined by ` / `
    pub fn message(&self) -> String {
        self.fragments.join(" / ")
    }

    /// Fold one device's verdict in
    ///
    /// Critical is never lowered, and ok only ever replaces unknown.
    pub fn record(mut self, device: &str, verdict: &Verdict, policy: &Policy) -> Evaluation {
        match *verdict {
            Verdict::Stale | Verdict::BackupFailed(_) => self.status = Status::Critical,
            Verdict::Changed => {}
            Verdict::Healthy => {
                if self.status == Status::Unknown {
                    self.status = Status::Ok;
                }
            }
        }
        self.fragments.push(verdict.fragment(device, policy));
        self
    }
}

/// Judge the newest record of every device, in device name order
pub fn evaluate(
    histories: &HashMap<String, DeviceHistory>,
    policy: &Policy,
    now: DateTime<Local>,
) -> Evaluation {
    histories
        .iter()
        .sorted_by(|&(a, _), &(b, _)| a.cmp(b))
        .fold(Evaluation::new(), |evaluation, (device, history)| {
            match history.last() {
                Some(last) => {
                    let verdict = Verdict::judge(last, policy, now);
                    debug!(device = %device, backups = history.len(), ?verdict, "judged device");
                    evaluation.record(device, &verdict, policy)
                }
                None => evaluation,
            }
        })
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::time::UNIX_EPOCH;

    use chrono::{DateTime, Duration, Local};

    use super::*;
    use crate::cattools::aggregate;
    use crate::cattools::log::LogEntry;

    fn entry(device: &str, age: Duration, backup: &str, changes: &str, now: DateTime<Local>) -> LogEntry {
        LogEntry {
            timestamp: now - age,
            group: "Core".into(),
            device: device.into(),
            address: "10.0.0.1".into(),
            device_type: "Cisco.Router.General".into(),
            backup: backup.into(),
            changes: changes.into(),
            html_report: String::new(),
            txt_report: String::new(),
        }
    }

    fn run(entries: Vec<LogEntry>, interval: u32, now: DateTime<Local>) -> Evaluation {
        evaluate(&aggregate(entries), &Policy::new(interval), now)
    }

    #[test]
    fn no_devices_is_unknown() {
        let evaluation = run(vec![], 1, Local::now());
        assert_eq!(evaluation.status(), Status::Unknown);
        assert!(evaluation.fragments().is_empty());
        assert_eq!(evaluation.message(), "");
    }

    #[test]
    fn recent_successful_backup_is_ok() {
        let now = Local::now();
        let evaluation = run(vec![entry("core-sw", Duration::hours(3), "OK", "", now)], 1, now);
        assert_eq!(evaluation.status(), Status::Ok);
        assert_eq!(evaluation.message(), "core-sw OK");
    }

    #[test]
    fn staleness_beats_a_successful_outcome() {
        let now = Local::now();
        let age = Duration::days(1) + Duration::hours(1) + Duration::seconds(1);
        let evaluation = run(vec![entry("core-sw", age, "OK", "", now)], 1, now);
        assert_eq!(evaluation.status(), Status::Critical);
        assert_eq!(evaluation.message(), "core-sw not backuped for more than 1 day(s)");
    }

    #[test]
    fn staleness_beats_a_failed_outcome() {
        let now = Local::now();
        let evaluation = run(
            vec![entry("core-sw", Duration::days(10), "Timeout", "", now)],
            3,
            now,
        );
        assert_eq!(evaluation.status(), Status::Critical);
        assert_eq!(evaluation.message(), "core-sw not backuped for more than 3 day(s)");
    }

    #[test]
    fn grace_hour_is_inclusive() {
        let now = Local::now();
        let age = Duration::days(2) + Duration::hours(1);
        let evaluation = run(vec![entry("core-sw", age, "OK", "", now)], 2, now);
        assert_eq!(evaluation.status(), Status::Ok);
    }

    #[test]
    fn failed_backup_is_critical() {
        let now = Local::now();
        let evaluation = run(
            vec![entry("core-sw", Duration::minutes(5), "Login failed", "Changed!", now)],
            1,
            now,
        );
        assert_eq!(evaluation.status(), Status::Critical);
        assert_eq!(evaluation.message(), "core-sw backup error: Login failed");
    }

    #[test]
    fn changed_config_is_noted_without_status() {
        let now = Local::now();
        let evaluation = run(
            vec![entry("core-sw", Duration::minutes(5), "OK", "Changed!", now)],
            1,
            now,
        );
        assert_eq!(evaluation.status(), Status::Unknown);
        assert_eq!(evaluation.message(), "core-sw config was changed");

        let evaluation = run(
            vec![
                entry("core-sw", Duration::minutes(5), "OK", "Changed!", now),
                entry("edge-rtr", Duration::minutes(5), "OK", "", now),
            ],
            1,
            now,
        );
        assert_eq!(evaluation.status(), Status::Ok);
        assert_eq!(evaluation.message(), "core-sw config was changed / edge-rtr OK");
    }

    #[test]
    fn ok_never_lowers_critical() {
        let now = Local::now();
        // log order is the reverse of name order
        let evaluation = run(
            vec![
                entry("b-edge", Duration::minutes(5), "OK", "", now),
                entry("a-core", Duration::minutes(5), "Failed", "", now),
            ],
            1,
            now,
        );
        assert_eq!(evaluation.status(), Status::Critical);
        assert_eq!(evaluation.message(), "a-core backup error: Failed / b-edge OK");

        let evaluation = run(
            vec![
                entry("b-edge", Duration::minutes(5), "Failed", "", now),
                entry("a-core", Duration::minutes(5), "OK", "", now),
            ],
            1,
            now,
        );
        assert_eq!(evaluation.status(), Status::Critical);
        assert_eq!(evaluation.message(), "a-core OK / b-edge backup error: Failed");
    }

    #[test]
    fn only_the_newest_record_counts() {
        let now = Local::now();
        let evaluation = run(
            vec![
                entry("core-sw", Duration::hours(30), "Failed", "", now),
                entry("core-sw", Duration::hours(2), "OK", "", now),
            ],
            1,
            now,
        );
        assert_eq!(evaluation.status(), Status::Ok);
        assert_eq!(evaluation.message(), "core-sw OK");
    }

    #[test]
    fn epoch_timestamps_are_stale() {
        let now = Local::now();
        let mut broken = entry("core-sw", Duration::zero(), "OK", "", now);
        broken.timestamp = DateTime::from(UNIX_EPOCH);
        let evaluation = run(vec![broken], 1, now);
        assert_eq!(evaluation.status(), Status::Critical);
    }

    #[test]
    fn result_does_not_depend_on_map_order() {
        let now = Local::now();
        let devices = ["sw-07", "rtr-2", "fw-1", "sw-03", "core", "ap-9"];
        let forwards = devices
            .iter()
            .map(|d| entry(d, Duration::minutes(1), "OK", "", now))
            .collect::<Vec<_>>();
        let backwards = forwards.iter().rev().cloned().collect::<Vec<_>>();

        let first = run(forwards, 1, now);
        assert_eq!(first, run(backwards.clone(), 1, now));
        assert_eq!(first, run(backwards, 1, now));
        assert_eq!(
            first.message(),
            "ap-9 OK / core OK / fw-1 OK / rtr-2 OK / sw-03 OK / sw-07 OK"
        );
    }

    #[test]
    fn empty_histories_are_skipped() {
        let mut histories = HashMap::new();
        histories.insert("ghost".to_owned(), DeviceHistory::default());
        let evaluation = evaluate(&histories, &Policy::new(1), Local::now());
        assert_eq!(evaluation, Evaluation::new());
    }
}
