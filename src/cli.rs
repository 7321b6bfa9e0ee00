// Command line interface module
// Defaults live in the config layer, so flags carry no default values
// here and only override when given explicitly.

use clap::error::ErrorKind;
use clap::Parser;

/// Serve files and directory listings from a directory over HTTP
#[derive(Debug, Parser)]
#[command(name = "simplehttpd", version)]
pub struct Cli {
    /// Port to listen on (default 8000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory to serve (default: current directory)
    #[arg(short, long)]
    pub directory: Option<String>,

    /// Config file to load, without extension
    #[arg(long)]
    pub config: Option<String>,
}

impl Cli {
    /// Parse process arguments; bad options print a diagnostic and exit 1.
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(err) => {
                let code = match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                    _ => 1,
                };
                let _ = err.print();
                std::process::exit(code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_flags() {
        let cli = Cli::try_parse_from(["simplehttpd", "--port", "9000", "--directory", "/srv"])
            .unwrap();
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.directory.as_deref(), Some("/srv"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn flags_are_optional() {
        let cli = Cli::try_parse_from(["simplehttpd"]).unwrap();
        assert!(cli.port.is_none());
        assert!(cli.directory.is_none());
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(Cli::try_parse_from(["simplehttpd", "--port", "eighty"]).is_err());
    }
}
