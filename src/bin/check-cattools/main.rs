//! Check CatTools device configuration backups over SFTP

mod args;

use chrono::Local;
use structopt::StructOpt;
use tracing::debug;

use cattools_plugins::cattools::{aggregate, evaluate, log, Report};
use cattools_plugins::error::CheckError;
use cattools_plugins::logging::init_logging;
use cattools_plugins::ssh::{self, Credentials};

use crate::args::Args;

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    init_logging(args.verbose);
    let report = match check(&args) {
        Ok(report) => report,
        Err(e) => Report::fatal(&e),
    };
    report.exit();
}

/// Everything between parsing args and printing
///
/// The session is closed before this returns, so `exit` never skips it.
fn check(args: &Args) -> Result<Report, CheckError> {
    let credentials = Credentials::load(&args.identity, args.password.as_deref());
    let session = ssh::connect(&args.target(), &credentials)?;
    let entries = log::fetch(&session)?;
    if let Err(e) = session.disconnect(None, "check complete", None) {
        debug!(error = %e, "unclean disconnect");
    }

    let histories = aggregate(entries);
    debug!(devices = histories.len(), "aggregated backup history");
    Ok(Report::from(evaluate(&histories, &args.policy(), Local::now())))
}
