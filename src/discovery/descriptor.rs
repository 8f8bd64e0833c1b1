//! Connectable server representation

use std::fmt;

/// Port used when the operator names a server directly
pub const DEFAULT_PORT: u16 = 6379;

/// A server the operator can pick and connect to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDescriptor {
    /// Hostname or IP of the primary endpoint
    pub endpoint: String,
    /// Port of the primary endpoint
    pub port: u16,
    /// Human-readable label (Name tag, else the group description)
    pub name: String,
    /// Negotiate TLS when dialing
    pub encrypted: bool,
}

impl ServerDescriptor {
    /// Descriptor for an address given on the command line
    ///
    /// Everything but `localhost` is assumed to require TLS.
    pub fn direct(address: &str, port: u16) -> Self {
        Self {
            endpoint: address.to_string(),
            port,
            name: address.to_string(),
            encrypted: !address.eq_ignore_ascii_case("localhost"),
        }
    }

    /// `endpoint:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.endpoint, self.port)
    }
}

impl fmt::Display for ServerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_localhost_is_plaintext() {
        let server = ServerDescriptor::direct("localhost", DEFAULT_PORT);
        assert!(!server.encrypted);
        assert_eq!(server.name, "localhost");
        assert_eq!(server.address(), "localhost:6379");

        assert!(!ServerDescriptor::direct("LocalHost", DEFAULT_PORT).encrypted);
    }

    #[test]
    fn test_direct_other_address_is_encrypted() {
        assert!(ServerDescriptor::direct("127.0.0.1", DEFAULT_PORT).encrypted);
        assert!(
            ServerDescriptor::direct("master.cache.abc123.use1.cache.amazonaws.com", 6379)
                .encrypted
        );
    }

    #[test]
    fn test_display_is_name_then_endpoint() {
        let server = ServerDescriptor {
            endpoint: "master.sessions.x.cache.amazonaws.com".to_string(),
            port: 6379,
            name: "sessions".to_string(),
            encrypted: true,
        };
        assert_eq!(
            server.to_string(),
            "sessions master.sessions.x.cache.amazonaws.com"
        );
    }
}
