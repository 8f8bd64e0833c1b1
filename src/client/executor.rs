//! Command execution trait
//!
//! The REPL and the script runner only talk to the server through this trait,
//! so either can be driven by a pooled connection or by a substitute in tests.

use crate::utils::{CommandError, RespValue};
use std::io;

/// Sends one command and returns the decoded reply
pub trait CommandExecutor {
    /// Execute a command with string arguments
    ///
    /// # Example
    /// ```ignore
    /// let response = conn.execute(&["PING"])?;
    /// let response = conn.execute(&["SET", "key", "value"])?;
    /// ```
    fn execute(&mut self, args: &[&str]) -> io::Result<RespValue>;
}

/// Convenience methods built on top of `CommandExecutor`
pub trait CommandExecutorExt: CommandExecutor {
    /// Execute `command` with `args`, turning an error reply into `CommandError::Server`
    fn call(&mut self, command: &str, args: &[&str]) -> Result<RespValue, CommandError> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(command);
        full.extend_from_slice(args);

        match self.execute(&full)? {
            RespValue::Error(e) => Err(CommandError::Server(e)),
            other => Ok(other),
        }
    }
}

impl<T: CommandExecutor + ?Sized> CommandExecutorExt for T {}

impl<T: CommandExecutor + ?Sized> CommandExecutor for &mut T {
    fn execute(&mut self, args: &[&str]) -> io::Result<RespValue> {
        (**self).execute(args)
    }
}
