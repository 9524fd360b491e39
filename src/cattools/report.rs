//! The one line a check prints, and the code it exits with

use std::fmt;

use crate::cattools::Evaluation;
use crate::Status;

/// Said when everything is ok but no device said so itself
pub const DEFAULT_OK_MESSAGE: &str = "CatTools Backup are Ok!";

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    status: Status,
    message: String,
}

impl Report {
    /// An ok report with nothing to say gets [`DEFAULT_OK_MESSAGE`]
    pub fn new<S: Into<String>>(status: Status, message: S) -> Report {
        let message = message.into();
        let message = if status == Status::Ok && message.is_empty() {
            DEFAULT_OK_MESSAGE.to_owned()
        } else {
            message
        };
        Report { status, message }
    }

    /// A check that could not get far enough to evaluate anything
    pub fn fatal<E: fmt::Display>(err: &E) -> Report {
        Report::new(Status::Critical, err.to_string())
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Print the report and exit with its status code
    pub fn exit(self) -> ! {
        println!("{}", self);
        self.status.exit()
    }
}

impl From<Evaluation> for Report {
    fn from(evaluation: Evaluation) -> Report {
        Report::new(evaluation.status(), evaluation.message())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.status {
            Status::Unknown => write!(f, "{0} {0} condition {1}", Status::Unknown, self.message),
            status => write!(f, "{} {}", status, self.message),
        }
    }
}
