// Configuration module entry point
// Layered loading: defaults, optional config file, environment, CLI flags

mod types;

// Re-export public types
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig};

use crate::cli::Cli;

impl Config {
    /// Load configuration with CLI flags taking precedence over the
    /// config file and `SIMPLEHTTPD`-prefixed environment variables.
    /// Default config file is "simplehttpd.toml" when no path specified.
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let file = cli.config.as_deref().unwrap_or("simplehttpd");
        let settings = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix("SIMPLEHTTPD"))
            .set_default("server.port", 8000)?
            .set_default("server.directory", ".")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_override_option("server.port", cli.port.map(i64::from))?
            .set_override_option("server.directory", cli.directory.clone())?
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn defaults_apply_without_flags() {
        let cfg = Config::load(&cli(&["simplehttpd"])).unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.directory, ".");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert_eq!(cfg.performance.keep_alive_timeout, 75);
        assert!(cfg.performance.max_connections.is_none());
        assert!(cfg.server.workers.is_none());
    }

    #[test]
    fn cli_flags_override_defaults() {
        let cfg = Config::load(&cli(&[
            "simplehttpd",
            "--port",
            "9090",
            "--directory",
            "/srv/files",
        ]))
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.directory, "/srv/files");
    }

    #[test]
    fn short_flags_work() {
        let cfg = Config::load(&cli(&["simplehttpd", "-p", "8080", "-d", "/tmp"])).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.directory, "/tmp");
    }
}
