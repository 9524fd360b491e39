//! Open an authenticated SSH session to the CatTools host
//!
//! A private key is offered first, then the password. Either one is
//! optional, but a check with neither is refused before any connection is
//! attempted.
//!
//! The host key is never compared against `known_hosts`. This is a poller
//! for hosts on a trusted network; the fingerprint that was presented is
//! logged at debug level so it can be checked by hand.

use std::fs;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use itertools::Itertools;
use ssh2::{ErrorCode, HashType, Session};
use tracing::{debug, warn};

use crate::error::ConnectError;

/// libssh2's `LIBSSH2_ERROR_TIMEOUT`
const SESSION_TIMEOUT: i32 = -9;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where to connect, and as whom
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub username: String,
    /// Deadline for connecting and for every blocking read or write after
    pub timeout: Duration,
}

impl Target {
    pub fn new<H: Into<String>, U: Into<String>>(host: H, port: u16, username: U) -> Target {
        Target {
            host: host.into(),
            port,
            username: username.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use `timeout` instead of the default; sub-second values are raised to
    /// one second
    pub fn with_timeout(mut self, timeout: Duration) -> Target {
        self.timeout = timeout.max(Duration::from_secs(1));
        self
    }
}

/// One way of proving who we are, in the order they are offered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthMethod<'a> {
    /// The contents of a private key file
    PublicKey(&'a str),
    Password(&'a str),
}

impl<'a> AuthMethod<'a> {
    fn name(&self) -> &'static str {
        match *self {
            AuthMethod::PublicKey(_) => "publickey",
            AuthMethod::Password(_) => "password",
        }
    }
}

/// Whatever credentials were usable out of what we were given
pub struct Credentials {
    identity: PathBuf,
    key: Option<String>,
    password: Option<String>,
}

impl Credentials {
    /// Load the private key at `identity` (`~` is the current user's home)
    ///
    /// A key that can't be read or doesn't look like a private key is dropped
    /// with a log message; it is not an error as long as a password remains.
    pub fn load(identity: &str, password: Option<&str>) -> Credentials {
        Credentials::load_from_home(identity, password, dirs::home_dir().as_deref())
    }

    fn load_from_home(identity: &str, password: Option<&str>, home: Option<&Path>) -> Credentials {
        let identity = expand_home(identity, home);
        let key = read_private_key(&identity);
        Credentials {
            identity,
            key,
            password: password.filter(|p| !p.is_empty()).map(str::to_owned),
        }
    }

    /// Auth methods to offer, key first
    pub fn methods(&self) -> Vec<AuthMethod<'_>> {
        let mut methods = Vec::with_capacity(2);
        if let Some(ref key) = self.key {
            methods.push(AuthMethod::PublicKey(key));
        }
        if let Some(ref password) = self.password {
            methods.push(AuthMethod::Password(password));
        }
        methods
    }
}

/// Replace a leading `~` path segment with `home`
///
/// Only `~` on its own or followed by `/` is expanded. `~user` forms and
/// paths without a leading `~` come back unchanged, as does everything when
/// there is no home directory.
pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) if path == "~" => home.to_path_buf(),
        Some(home) => match path.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

fn read_private_key(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            if looks_like_private_key(&contents) {
                debug!(identity = %path.display(), "loaded private key");
                Some(contents)
            } else {
                warn!(identity = %path.display(), "not a PEM or OpenSSH private key, not offering it");
                None
            }
        }
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(identity = %path.display(), "no identity file");
            None
        }
        Err(e) => {
            warn!(identity = %path.display(), error = %e, "unable to read identity file");
            None
        }
    }
}

/// PEM armor around something that calls itself a private key
fn looks_like_private_key(contents: &str) -> bool {
    let mut lines = contents.trim_start().lines();
    match lines.next() {
        Some(first) => {
            let first = first.trim_end();
            first.starts_with("-----BEGIN ")
                && first.ends_with("PRIVATE KEY-----")
                && lines.any(|l| l.trim_end().starts_with("-----END "))
        }
        None => false,
    }
}

/// Connect, handshake and authenticate
pub fn connect(target: &Target, credentials: &Credentials) -> Result<Session, ConnectError> {
    let methods = credentials.methods();
    if methods.is_empty() {
        return Err(ConnectError::NoAuthMethods {
            identity: credentials.identity.display().to_string(),
        });
    }

    let (tcp, addr) = open_stream(target)?;
    let mut session = Session::new().map_err(ConnectError::Handshake)?;
    session.set_tcp_stream(tcp);
    session.set_timeout(millis(target.timeout));
    session.handshake().map_err(|e| {
        if is_timeout(&e) {
            ConnectError::Timeout {
                addr,
                after: target.timeout,
            }
        } else {
            ConnectError::Handshake(e)
        }
    })?;

    if let Some(hash) = session.host_key_hash(HashType::Sha256) {
        let fingerprint = hash.iter().map(|b| format!("{:02x}", b)).join(":");
        debug!(%addr, %fingerprint, "accepting host key without verification");
    }

    let mut failures = Vec::new();
    for method in methods {
        let attempt = match method {
            AuthMethod::PublicKey(key) => {
                session.userauth_pubkey_memory(&target.username, None, key, None)
            }
            AuthMethod::Password(password) => {
                session.userauth_password(&target.username, password)
            }
        };
        match attempt {
            Ok(()) if session.authenticated() => {
                debug!(method = method.name(), user = %target.username, "authenticated");
                return Ok(session);
            }
            Ok(()) => failures.push(format!("{} rejected", method.name())),
            Err(ref e) if is_timeout(e) => {
                return Err(ConnectError::Timeout {
                    addr,
                    after: target.timeout,
                });
            }
            Err(e) => {
                debug!(method = method.name(), error = %e, "authentication attempt failed");
                failures.push(format!("{}: {}", method.name(), e.message()));
            }
        }
    }
    Err(ConnectError::Auth {
        user: target.username.clone(),
        reason: failures.join(", "),
    })
}

/// Try each address `host` resolves to until one accepts
fn open_stream(target: &Target) -> Result<(TcpStream, SocketAddr), ConnectError> {
    let addrs = (target.host.as_str(), target.port)
        .to_socket_addrs()
        .map_err(|source| ConnectError::Resolve {
            host: target.host.clone(),
            source,
        })?;

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, target.timeout) {
            Ok(stream) => {
                stream.set_read_timeout(Some(target.timeout))?;
                stream.set_write_timeout(Some(target.timeout))?;
                return Ok((stream, addr));
            }
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => {
                debug!(%addr, "connect timed out");
                last_err = Some(ConnectError::Timeout {
                    addr,
                    after: target.timeout,
                });
            }
            Err(e) => {
                debug!(%addr, error = %e, "connect failed");
                last_err = Some(ConnectError::Io(e));
            }
        }
    }
    Err(last_err.unwrap_or_else(|| ConnectError::Resolve {
        host: target.host.clone(),
        source: io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
    }))
}

fn is_timeout(e: &ssh2::Error) -> bool {
    e.code() == ErrorCode::Session(SESSION_TIMEOUT)
}

fn millis(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::max_value())) as u32
}
