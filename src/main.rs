//! elasticache-cli - interactive Redis CLI for ElastiCache
//!
//! With a server argument it connects directly; otherwise it lists the
//! account's replication groups and asks which one to open.

use anyhow::Result;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use elasticache_cli::config::{CliArgs, SessionConfig};
use elasticache_cli::session;

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse_args();

    setup_logging(args.verbose, args.quiet);

    let config = SessionConfig::from_cli(&args)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    session::run(&config)
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
