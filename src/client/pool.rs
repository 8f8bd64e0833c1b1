//! Connection pool for a single chosen server
//!
//! The pool dials lazily: building it does no I/O. Connections handed out by
//! `acquire` go back to the idle list when dropped, unless they saw an I/O
//! error or the idle list is already full.
//!
//! After a failed read the rest of that reply may still sit in the buffer, so
//! a failed connection refuses every later command instead of decoding
//! leftovers as the next reply.

use std::io;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::executor::CommandExecutor;
use super::raw_connection::RawConnection;
use crate::discovery::ServerDescriptor;
use crate::utils::{ConnectionError, RespValue};

/// Dial settings shared by every connection of a pool
#[derive(Debug, Clone)]
pub struct DialOptions {
    pub connect_timeout: Duration,
    pub max_idle: usize,
}

impl Default for DialOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            max_idle: 80,
        }
    }
}

/// Reusable source of connections to one server
pub struct ConnectionPool {
    server: ServerDescriptor,
    options: DialOptions,
    idle: Mutex<Vec<RawConnection>>,
}

impl ConnectionPool {
    pub fn build(server: ServerDescriptor, options: DialOptions) -> Self {
        Self {
            server,
            options,
            idle: Mutex::new(Vec::new()),
        }
    }

    pub fn server(&self) -> &ServerDescriptor {
        &self.server
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Take an idle connection or dial a new one
    pub fn acquire(&self) -> Result<PooledConnection<'_>, ConnectionError> {
        let reused = self.idle.lock().pop();
        let conn = match reused {
            Some(conn) => conn,
            None => {
                let conn = RawConnection::connect(
                    &self.server.endpoint,
                    self.server.port,
                    self.server.encrypted,
                    self.options.connect_timeout,
                )?;
                info!(
                    "Connected to {} ({})",
                    self.server.address(),
                    if conn.is_tls() { "tls" } else { "plaintext" }
                );
                conn
            }
        };

        Ok(PooledConnection {
            conn: Some(conn),
            pool: self,
            failure: None,
        })
    }

    fn release(&self, conn: RawConnection) {
        let mut idle = self.idle.lock();
        if idle.len() < self.options.max_idle {
            idle.push(conn);
        } else {
            debug!("Idle list full, closing connection to {}", self.server.address());
        }
    }
}

/// A connection checked out of a `ConnectionPool`
pub struct PooledConnection<'a> {
    conn: Option<RawConnection>,
    pool: &'a ConnectionPool,
    failure: Option<String>,
}

impl Deref for PooledConnection<'_> {
    type Target = RawConnection;

    fn deref(&self) -> &RawConnection {
        self.conn.as_ref().expect("connection present until drop")
    }
}

impl DerefMut for PooledConnection<'_> {
    fn deref_mut(&mut self) -> &mut RawConnection {
        self.conn.as_mut().expect("connection present until drop")
    }
}

impl CommandExecutor for PooledConnection<'_> {
    fn execute(&mut self, args: &[&str]) -> io::Result<RespValue> {
        if let Some(reason) = &self.failure {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                ConnectionError::Closed(reason.clone()),
            ));
        }

        let result = (**self).execute(args);
        if let Err(e) = &result {
            debug!("Connection to {} failed: {}", self.pool.server.address(), e);
            self.failure = Some(e.to_string());
        }
        result
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if self.failure.is_some() {
                debug!("Discarding broken connection to {}", self.pool.server.address());
            } else {
                self.pool.release(conn);
            }
        }
    }
}
