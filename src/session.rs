//! Session driver
//!
//! Picks the server (directly or from discovery), opens the connection and
//! hands it to the command loop.

use std::io::{self, Write};

use anyhow::Context;
use tracing::{info, warn};

use crate::client::ConnectionPool;
use crate::config::{SessionConfig, Target};
use crate::discovery::{discover, AwsInventory, RegionResolver, ServerDescriptor, METADATA_BASE_URL};
use crate::repl::{choose_server, CommandEngine, LineReader, Terminal};

/// Run one interactive session as configured
///
/// Returns `Ok(())` without connecting when the operator's menu answer names
/// no server.
pub fn run(config: &SessionConfig) -> anyhow::Result<()> {
    let server = match &config.target {
        Target::Direct { address, port } => ServerDescriptor::direct(address, *port),
        Target::Discover => match pick_discovered(config)? {
            Some(server) => server,
            None => return Ok(()),
        },
    };

    eprintln!("Connecting to {}...", server.name);
    let pool = ConnectionPool::build(server, config.dial_options());
    let terminal = Terminal::new().context("Failed to initialise terminal")?;

    serve(&pool, terminal, &mut io::stdout(), &mut io::stderr())
}

fn pick_discovered(config: &SessionConfig) -> anyhow::Result<Option<ServerDescriptor>> {
    let resolver = RegionResolver::new(METADATA_BASE_URL, config.metadata_timeout);
    let region = resolver.resolve(&config.region);
    if region.is_empty() {
        eprintln!("Could not determine the region from instance metadata; use --region");
    } else {
        info!("Using region {}", region);
    }

    let inventory = AwsInventory::connect(&region)?;
    let servers = discover(&inventory, &config.engine)?;
    if servers.is_empty() {
        warn!("No {} replication groups found", config.engine);
    }

    let stdin = io::stdin();
    let chosen = choose_server(servers, &mut stdin.lock(), &mut io::stderr())?;
    Ok(chosen)
}

/// Check a connection out of `pool` and run the command loop on it
///
/// A dial failure is returned before any input is read.
pub fn serve<L: LineReader, O: Write, E: Write>(
    pool: &ConnectionPool,
    input: L,
    out: &mut O,
    err: &mut E,
) -> anyhow::Result<()> {
    let conn = pool
        .acquire()
        .map_err(|e| anyhow::anyhow!("Connection failed: {}", e))?;

    let mut engine = CommandEngine::new(conn, input);
    engine.run(out, err)?;

    // Back to the pool; closed when the pool goes away
    drop(engine.into_connection());
    Ok(())
}
