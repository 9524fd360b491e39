use std::time::Duration;

use structopt::StructOpt;

use cattools_plugins::cattools::Policy;
use cattools_plugins::ssh::Target;

/// Check CatTools backup logs
///
/// Reads the last 100 rows of CatTools' "Device.Backup.Running Config.txt"
/// over SFTP and goes critical if the most recent backup of any device failed
/// or is older than the interval (plus one hour of grace).
#[derive(StructOpt, Debug)]
#[structopt(
    name = "check-cattools (part of cattools-plugins)",
    setting = structopt::clap::AppSettings::ColoredHelp
)]
pub(crate) struct Args {
    #[structopt(short = "H", long = "host", help = "Hostname or IP Address")]
    pub host: String,
    #[structopt(short = "P", long = "port", help = "Port number", default_value = "22")]
    pub port: u16,
    #[structopt(short = "u", long = "username", help = "Username")]
    pub username: String,
    #[structopt(
        short = "p",
        long = "password",
        help = "Password, tried after the private key"
    )]
    pub password: Option<String>,
    #[structopt(
        short = "i",
        long = "identity",
        help = "Private key file",
        default_value = "~/.ssh/id_rsa"
    )]
    pub identity: String,
    #[structopt(
        short = "I",
        long = "interval",
        help = "Interval of backup in days",
        default_value = "1"
    )]
    pub interval: u32,
    #[structopt(
        short = "t",
        long = "timeout",
        help = "Seconds to wait on the SFTP server before going critical",
        default_value = "10"
    )]
    pub timeout: u64,
    #[structopt(
        short = "v",
        long = "verbose",
        help = "Log connection and evaluation details to stderr"
    )]
    pub verbose: bool,
}

impl Args {
    pub fn target(&self) -> Target {
        Target::new(self.host.as_str(), self.port, self.username.as_str())
            .with_timeout(Duration::from_secs(self.timeout))
    }

    pub fn policy(&self) -> Policy {
        Policy::new(self.interval)
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use structopt::StructOpt;

    use super::Args;

    fn build_args(argv: Vec<&str>) -> Args {
        Args::from_iter(argv.into_iter())
    }

    #[test]
    fn defaults() {
        let args = build_args(vec!["check-cattools", "-H", "cattools01", "-u", "monitor"]);
        assert_eq!(args.host, "cattools01");
        assert_eq!(args.username, "monitor");
        assert_eq!(args.port, 22);
        assert_eq!(args.password, None);
        assert_eq!(args.identity, "~/.ssh/id_rsa");
        assert_eq!(args.interval, 1);
        assert_eq!(args.timeout, 10);
        assert!(!args.verbose);
    }

    #[test]
    fn long_flags() {
        let args = build_args(vec![
            "check-cattools",
            "--host=10.1.1.1",
            "--username=backup",
            "--password=secret",
            "--identity=/etc/cattools/key",
            "--port=2222",
            "--interval=7",
            "--timeout=30",
            "--verbose",
        ]);
        assert_eq!(args.password.as_deref(), Some("secret"));
        assert_eq!(args.identity, "/etc/cattools/key");

        let target = args.target();
        assert_eq!(target.host, "10.1.1.1");
        assert_eq!(target.port, 2222);
        assert_eq!(target.username, "backup");
        assert_eq!(target.timeout, Duration::from_secs(30));
        assert_eq!(args.policy().interval_days, 7);
        assert!(args.verbose);
    }

    #[test]
    fn host_and_username_are_required() {
        assert!(Args::from_iter_safe(vec!["check-cattools", "-u", "monitor"]).is_err());
        assert!(Args::from_iter_safe(vec!["check-cattools", "-H", "cattools01"]).is_err());
    }
}
