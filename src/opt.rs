use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Options {
    /// Logging verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(
        short = 'a',
        long = "host",
        value_name = "address",
        default_value = "localhost",
        help = "Address to serve on",
        long_help = r"Address to serve on:
    - either `localhost` or an IP address
Examples:
    - localhost
    - 0.0.0.0
    - ::1"
    )]
    pub host: String,

    /// Port to serve on
    #[arg(
        short = 'p',
        long = "port",
        value_name = "port",
        default_value_t = 8080,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: u16,

    /// Pacman package cache location
    #[arg(
        short = 'd',
        long = "cachedir",
        value_name = "dir",
        default_value = "/var/cache/pacman/pkg/"
    )]
    pub cachedir: PathBuf,

    /// Pacman databases location
    #[arg(
        short = 'b',
        long = "dbpath",
        value_name = "dir",
        default_value = "/var/lib/pacman/sync/"
    )]
    pub dbpath: PathBuf,

    /// Directory for all other requests [default: current directory]
    #[arg(short = 'r', long = "root", value_name = "dir")]
    pub root: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Options::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let options = Options::try_parse_from(["paclan"]).unwrap();
        assert_eq!(options.verbose, 0);
        assert_eq!(options.host, "localhost");
        assert_eq!(options.port, 8080);
        assert_eq!(options.cachedir, PathBuf::from("/var/cache/pacman/pkg/"));
        assert_eq!(options.dbpath, PathBuf::from("/var/lib/pacman/sync/"));
        assert_eq!(options.root, None);
    }

    #[test]
    fn short_flags() {
        let options = Options::try_parse_from([
            "paclan", "-vv", "-a", "0.0.0.0", "-p", "7878", "-d", "/pkg", "-b", "/db", "-r",
            "/www",
        ])
        .unwrap();
        assert_eq!(options.verbose, 2);
        assert_eq!(options.host, "0.0.0.0");
        assert_eq!(options.port, 7878);
        assert_eq!(options.cachedir, PathBuf::from("/pkg"));
        assert_eq!(options.dbpath, PathBuf::from("/db"));
        assert_eq!(options.root, Some(PathBuf::from("/www")));
    }

    #[test]
    fn port_out_of_range() {
        assert!(Options::try_parse_from(["paclan", "--port", "0"]).is_err());
        assert!(Options::try_parse_from(["paclan", "--port", "65536"]).is_err());
        assert!(Options::try_parse_from(["paclan", "--port", "65535"]).is_ok());
    }
}
