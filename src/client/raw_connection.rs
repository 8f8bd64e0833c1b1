//! Raw TCP connection to a cache server
//!
//! Plain TCP or TLS, chosen per server. TLS skips certificate and hostname
//! verification: the endpoint is trusted because it came from the account's
//! own inventory (or was typed by the operator).

use std::io::{self, BufReader, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use super::executor::CommandExecutor;
use crate::utils::{ConnectionError, RespDecoder, RespEncoder, RespValue};

/// Raw connection wrapper (TCP or TLS)
///
/// For TCP the stream is split into a buffered reader and writer.
/// native-tls streams cannot be cloned, so TLS keeps a single buffered stream.
pub enum RawConnection {
    Tcp {
        writer: BufWriter<TcpStream>,
        reader: BufReader<TcpStream>,
    },
    #[cfg(feature = "native-tls-backend")]
    NativeTls {
        stream: BufReader<native_tls::TlsStream<TcpStream>>,
    },
}

/// Resolve `host:port` and open a TCP socket with a connect timeout
fn dial_tcp(host: &str, port: u16, connect_timeout: Duration) -> Result<TcpStream, ConnectionError> {
    let connect_failed = |source: io::Error| ConnectionError::ConnectFailed {
        host: host.to_string(),
        port,
        source,
    };

    let addr = (host, port)
        .to_socket_addrs()
        .map_err(connect_failed)?
        .next()
        .ok_or_else(|| {
            connect_failed(io::Error::new(
                io::ErrorKind::NotFound,
                "No addresses found",
            ))
        })?;

    debug!("Dialing {} ({})", addr, host);
    let stream = TcpStream::connect_timeout(&addr, connect_timeout).map_err(connect_failed)?;
    stream.set_nodelay(true).ok();
    Ok(stream)
}

impl RawConnection {
    /// Dial the server, negotiating TLS when `encrypted` is set
    pub fn connect(
        host: &str,
        port: u16,
        encrypted: bool,
        connect_timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        if encrypted {
            Self::connect_tls(host, port, connect_timeout)
        } else {
            Self::connect_tcp(host, port, connect_timeout)
        }
    }

    /// Create new plaintext TCP connection
    pub fn connect_tcp(
        host: &str,
        port: u16,
        connect_timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        let stream = dial_tcp(host, port, connect_timeout)?;
        let writer = BufWriter::new(stream.try_clone().map_err(|e| {
            ConnectionError::ConnectFailed {
                host: host.to_string(),
                port,
                source: e,
            }
        })?);
        let reader = BufReader::new(stream);

        Ok(RawConnection::Tcp { writer, reader })
    }

    /// Create new TLS connection without peer verification
    #[cfg(feature = "native-tls-backend")]
    pub fn connect_tls(
        host: &str,
        port: u16,
        connect_timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        let connector = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()
            .map_err(|e| {
                ConnectionError::TlsFailed(format!("Failed to build TLS connector: {}", e))
            })?;

        let tcp_stream = dial_tcp(host, port, connect_timeout)?;
        let tls_stream = connector
            .connect(host, tcp_stream)
            .map_err(|e| ConnectionError::TlsFailed(format!("{}:{}: {}", host, port, e)))?;

        Ok(RawConnection::NativeTls {
            stream: BufReader::new(tls_stream),
        })
    }

    #[cfg(not(feature = "native-tls-backend"))]
    pub fn connect_tls(
        _host: &str,
        _port: u16,
        _connect_timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        Err(ConnectionError::TlsFailed(
            "TLS support not compiled in".to_string(),
        ))
    }

    /// Whether this connection negotiated TLS
    pub fn is_tls(&self) -> bool {
        match self {
            RawConnection::Tcp { .. } => false,
            #[cfg(feature = "native-tls-backend")]
            RawConnection::NativeTls { .. } => true,
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            RawConnection::Tcp { writer, .. } => {
                writer.write_all(buf)?;
                writer.flush()
            }
            #[cfg(feature = "native-tls-backend")]
            RawConnection::NativeTls { stream } => {
                let inner = stream.get_mut();
                inner.write_all(buf)?;
                inner.flush()
            }
        }
    }

    fn read_response(&mut self) -> io::Result<RespValue> {
        match self {
            RawConnection::Tcp { reader, .. } => RespDecoder::new(reader).decode(),
            #[cfg(feature = "native-tls-backend")]
            RawConnection::NativeTls { stream } => RespDecoder::new(stream).decode(),
        }
    }

    /// Send a pre-encoded command and read one reply
    pub fn execute_encoded(&mut self, encoder: &RespEncoder) -> io::Result<RespValue> {
        self.write_all(encoder.as_bytes())?;
        self.read_response()
    }
}

impl CommandExecutor for RawConnection {
    fn execute(&mut self, args: &[&str]) -> io::Result<RespValue> {
        let capacity = args.iter().map(|a| a.len() + 16).sum::<usize>() + 16;
        let mut encoder = RespEncoder::with_capacity(capacity);
        encoder.encode_command_str(args);
        self.execute_encoded(&encoder)
    }
}
