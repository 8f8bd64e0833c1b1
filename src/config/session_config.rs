//! Session configuration derived from CLI arguments

use std::time::Duration;

use super::cli::CliArgs;
use crate::client::DialOptions;
use crate::utils::ConfigError;

/// How the server to open is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Address given on the command line
    Direct { address: String, port: u16 },
    /// Ask the operator to pick from discovered servers
    Discover,
}

/// Complete session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub target: Target,
    pub region: String,
    pub engine: String,
    pub metadata_timeout: Duration,
    pub connect_timeout: Duration,
    pub quiet: bool,
    pub verbose: bool,
}

impl SessionConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        if args.engine.trim().is_empty() {
            return Err(ConfigError::EmptyEngine);
        }
        if args.connect_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("--connect-timeout"));
        }
        if args.metadata_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("--metadata-timeout"));
        }

        let target = match &args.server {
            Some(address) => Target::Direct {
                address: address.clone(),
                port: args.port,
            },
            None => Target::Discover,
        };

        Ok(Self {
            target,
            region: args.region.trim().to_string(),
            engine: args.engine.trim().to_string(),
            metadata_timeout: Duration::from_millis(args.metadata_timeout_ms),
            connect_timeout: Duration::from_millis(args.connect_timeout_ms),
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }

    pub fn dial_options(&self) -> DialOptions {
        DialOptions {
            connect_timeout: self.connect_timeout,
            ..DialOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_discovery_when_no_server() {
        let config = SessionConfig::from_cli(&CliArgs::parse_from(["test"])).unwrap();
        assert_eq!(config.target, Target::Discover);
        assert_eq!(config.dial_options().connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_direct_target_uses_port_flag() {
        let args = CliArgs::parse_from(["test", "-p", "6380", "cache.internal"]);
        let config = SessionConfig::from_cli(&args).unwrap();
        assert_eq!(
            config.target,
            Target::Direct {
                address: "cache.internal".to_string(),
                port: 6380,
            }
        );
    }

    #[test]
    fn test_validation() {
        let args = CliArgs::parse_from(["test", "--engine", " "]);
        assert!(matches!(
            SessionConfig::from_cli(&args),
            Err(ConfigError::EmptyEngine)
        ));

        let args = CliArgs::parse_from(["test", "--connect-timeout", "0"]);
        assert!(SessionConfig::from_cli(&args).is_err());
    }
}
