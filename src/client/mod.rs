//! Client connection layer

pub mod executor;
pub mod pool;
pub mod raw_connection;

pub use executor::{CommandExecutor, CommandExecutorExt};
pub use pool::{ConnectionPool, DialOptions, PooledConnection};
pub use raw_connection::RawConnection;
