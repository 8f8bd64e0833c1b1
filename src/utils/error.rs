//! Error types for elasticache-cli

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Connection-related errors
///
/// Any of these raised while dialing is fatal to the session.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to connect to {host}:{port}: {source}")]
    ConnectFailed {
        host: String,
        port: u16,
        source: io::Error,
    },

    #[error("TLS handshake failed: {0}")]
    TlsFailed(String),

    /// A previous reply could not be read; the stream is out of step
    #[error("Connection closed after earlier failure: {0}")]
    Closed(String),
}

/// Errors raised by an inventory backend (ElastiCache API or a substitute)
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("{operation} failed: {message}")]
    Request { operation: String, message: String },

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
}

/// Discovery errors; listing failures end the program before a server list is offered
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("user does not have permissions to {operation}: {message}")]
    PermissionDenied { operation: String, message: String },
}

/// A command sent from the REPL failed
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Server(String),
}

/// Script execution errors (`eval <file>`)
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("usage: eval <script-file>")]
    MissingPath,

    #[error("open {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{0}")]
    Remote(String),

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("--engine must not be empty")]
    EmptyEngine,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_message_names_operation() {
        let err = DiscoveryError::PermissionDenied {
            operation: "describe cache clusters".to_string(),
            message: "AccessDenied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "user does not have permissions to describe cache clusters: AccessDenied"
        );
    }

    #[test]
    fn test_script_read_error_shows_path() {
        let err = ScriptError::Read {
            path: PathBuf::from("/tmp/missing.lua"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "open /tmp/missing.lua: No such file or directory"
        );
    }
}
