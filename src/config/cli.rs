//! Command-line argument parsing

use clap::Parser;

use crate::discovery::{DEFAULT_ENGINE, DEFAULT_PORT};

/// Interactive Redis CLI for ElastiCache replication groups
///
/// Without SERVER, lists the account's replication groups and asks which
/// one to open.
#[derive(Parser, Debug, Clone)]
#[command(name = "elasticache-cli")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Server to connect to directly, skipping discovery (TLS unless "localhost")
    pub server: Option<String>,

    // ===== Discovery =====
    /// Region to query (default: read from instance metadata)
    #[arg(long = "region", default_value = "")]
    pub region: String,

    /// Cache engine to list
    #[arg(long = "engine", default_value = DEFAULT_ENGINE)]
    pub engine: String,

    /// Instance metadata timeout in milliseconds
    #[arg(long = "metadata-timeout", default_value_t = 1000)]
    pub metadata_timeout_ms: u64,

    // ===== Connection =====
    /// Port used with SERVER
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Connection timeout in milliseconds
    #[arg(long = "connect-timeout", default_value_t = 5000)]
    pub connect_timeout_ms: u64,

    // ===== Output =====
    /// Quiet mode (errors only)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
