//! Configuration module

pub mod cli;
pub mod session_config;

pub use cli::CliArgs;
pub use session_config::{SessionConfig, Target};
