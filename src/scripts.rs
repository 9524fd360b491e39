//! Documentation about the scripts contained herein
//!
//! - [check-cattools](#check-cattools)
//!
//! # check-cattools
//!
//! Cross platform, only requires SFTP access to the CatTools server.
//!
//! ```plain
//! $ check-cattools --help
//! check-cattools (part of cattools-plugins) 0.1.0
//! Check CatTools backup logs
//!
//! Reads the last 100 rows of CatTools' "Device.Backup.Running Config.txt" over SFTP and goes critical if the most
//! recent backup of any device failed or is older than the interval (plus one hour of grace).
//!
//! USAGE:
//!     check-cattools [FLAGS] [OPTIONS] --host <host> --username <username>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!     -v, --verbose    Log connection and evaluation details to stderr
//!
//! OPTIONS:
//!     -H, --host <host>              Hostname or IP Address
//!     -i, --identity <identity>      Private key file [default: ~/.ssh/id_rsa]
//!     -I, --interval <interval>      Interval of backup in days [default: 1]
//!     -p, --password <password>      Password, tried after the private key
//!     -P, --port <port>              Port number [default: 22]
//!     -t, --timeout <timeout>        Seconds to wait on the SFTP server before going critical [default: 10]
//!     -u, --username <username>      Username
//!
//! ```
//!
//! Output is a single line, for example:
//!
//! ```plain
//! CRITICAL core-sw-01 backup error: Timeout / edge-rtr-02 OK / lab-sw not backuped for more than 1 day(s)
//! ```
//!
//! Exit codes are 0 for `OK`, 2 for `CRITICAL` and 3 for `UNKNOWN`. A
//! device whose config changed is listed but leaves the status alone, so a
//! log that only contains changed devices is `UNKNOWN`.
