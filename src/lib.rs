//! elasticache-cli library
//!
//! Interactive Redis command line for ElastiCache: discovers the account's
//! replication groups, connects to the chosen one over TCP or TLS and runs a
//! read-eval-print loop against it.

pub mod client;
pub mod config;
pub mod discovery;
pub mod repl;
pub mod session;
pub mod utils;
