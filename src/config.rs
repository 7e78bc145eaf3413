use crate::opt::Options;
use crate::resolve::RootSet;
use nix::errno::Errno;
use nix::unistd::{access, AccessFlags};
use std::fmt::{self, Display};
use std::io;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

/// Validated startup configuration, immutable once built.
#[derive(Debug)]
pub struct Config {
    pub addrs: Vec<SocketAddr>,
    pub roots: RootSet,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid address provided to --host: {0:?} (expected `localhost` or an IP address)")]
    InvalidHost(String),
    #[error("Could not resolve --host {host:?}: {source}")]
    Unresolvable {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid location provided to --{flag}: {} is not a directory", .path.display())]
    NotADirectory { flag: &'static str, path: PathBuf },
    #[error(
        "Invalid location provided to --{flag}: {} needs both read and execute permissions ({source})",
        .path.display()
    )]
    NotAccessible {
        flag: &'static str,
        path: PathBuf,
        #[source]
        source: Errno,
    },
    #[error("Could not determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),
}

/// Every problem found while validating, so they can all be fixed in one go.
#[derive(Debug)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            Display::fmt(e, f)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

impl Config {
    pub fn from_options(options: Options) -> Result<Self, ConfigErrors> {
        let Options {
            verbose: _,
            host,
            port,
            cachedir,
            dbpath,
            root,
        } = options;

        let mut errors = Vec::new();

        let addrs = host_addrs(&host, port).map_err(|e| errors.push(e)).ok();
        let packages = check_dir("cachedir", cachedir, &mut errors);
        let databases = check_dir("dbpath", dbpath, &mut errors);
        let default = match root {
            Some(root) => check_dir("root", root, &mut errors),
            None => match std::env::current_dir() {
                Ok(cwd) => Some(cwd),
                Err(e) => {
                    errors.push(ConfigError::CurrentDir(e));
                    None
                }
            },
        };

        match (addrs, packages, databases, default) {
            (Some(addrs), Some(packages), Some(databases), Some(default)) if errors.is_empty() => {
                Ok(Self {
                    addrs,
                    roots: RootSet {
                        packages,
                        databases,
                        default,
                    },
                })
            }
            _ => Err(ConfigErrors(errors)),
        }
    }
}

fn host_addrs(host: &str, port: u16) -> Result<Vec<SocketAddr>, ConfigError> {
    if host == "localhost" {
        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|source| ConfigError::Unresolvable {
                host: host.to_string(),
                source,
            })?
            .collect::<Vec<_>>();
        match addrs.len() {
            0 => Err(ConfigError::Unresolvable {
                host: host.to_string(),
                source: io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    "Resolved to zero addresses",
                ),
            }),
            _ => Ok(addrs),
        }
    } else {
        match host.parse::<IpAddr>() {
            Ok(ip) => Ok(vec![SocketAddr::new(ip, port)]),
            Err(_) => Err(ConfigError::InvalidHost(host.to_string())),
        }
    }
}

fn check_dir(flag: &'static str, path: PathBuf, errors: &mut Vec<ConfigError>) -> Option<PathBuf> {
    if !path.is_dir() {
        errors.push(ConfigError::NotADirectory { flag, path });
        return None;
    }
    if let Err(source) = access(path.as_path(), AccessFlags::R_OK | AccessFlags::X_OK) {
        errors.push(ConfigError::NotAccessible { flag, path, source });
        return None;
    }
    Some(path)
}
