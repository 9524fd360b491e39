//! Errors that stop a check before any device can be evaluated
//!
//! Both kinds are reported as `CRITICAL`: without a session or without the
//! log there is nothing to evaluate.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Failure to get an authenticated session to the CatTools host
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("No authentication method available: identity file {identity} is not a usable private key and no password was given")]
    NoAuthMethods { identity: String },
    #[error("Error resolving SFTP server {host}: {source}")]
    Resolve { host: String, source: io::Error },
    #[error("Timed out after {}s connecting SFTP server {addr}", .after.as_secs())]
    Timeout { addr: SocketAddr, after: Duration },
    #[error("Error connecting SFTP server: {0}")]
    Io(#[from] io::Error),
    #[error("Error connecting SFTP server: {0}")]
    Handshake(ssh2::Error),
    #[error("Error connecting SFTP server: authentication failed for user {user}: {reason}")]
    Auth { user: String, reason: String },
}

/// Failure to read the backup log once a session exists
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error connecting SFTP server: {0}")]
    Sftp(ssh2::Error),
    #[error("Error opening 'Device.Backup.Running Config.txt' file: {0}")]
    Open(ssh2::Error),
    #[error("Timed out reading 'Device.Backup.Running Config.txt' file")]
    Timeout,
    #[error("Error reading 'Device.Backup.Running Config.txt' file: {0}")]
    Read(io::Error),
}

impl From<io::Error> for FetchError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::TimedOut => FetchError::Timeout,
            _ => FetchError::Read(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Connect(#[from] ConnectError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
