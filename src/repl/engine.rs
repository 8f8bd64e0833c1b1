//! The read-eval-print loop
//!
//! Lines are split on whitespace with no quoting. `quit`/`exit` end the
//! session, `eval <file>` runs a local script, anything else is sent to the
//! server verbatim. Command failures are printed and the loop goes on.

use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use super::render::render;
use super::script::run_script;
use crate::client::{CommandExecutor, CommandExecutorExt};
use crate::utils::{RespValue, ScriptError};

/// Prompt shown before every line
pub const PROMPT: &str = "redis> ";

/// Source of input lines
pub trait LineReader {
    /// Next line without its terminator, `Ok(None)` at end of input
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    AwaitingInput,
    Terminated,
}

/// What a single input line asks for
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch<'a> {
    /// Blank line: nothing is sent
    Skip,
    Quit,
    /// `eval` with the script path, if one was given
    Eval(Option<&'a str>),
    Command { name: &'a str, args: Vec<&'a str> },
}

/// Classify an input line
pub fn parse_line(line: &str) -> Dispatch<'_> {
    let mut tokens = line.split_whitespace();
    let Some(name) = tokens.next() else {
        return Dispatch::Skip;
    };

    if name.eq_ignore_ascii_case("quit") || name.eq_ignore_ascii_case("exit") {
        Dispatch::Quit
    } else if name.eq_ignore_ascii_case("eval") {
        Dispatch::Eval(tokens.next())
    } else {
        Dispatch::Command {
            name,
            args: tokens.collect(),
        }
    }
}

/// Interactive command loop over one connection
///
/// The engine owns the connection for the whole session.
pub struct CommandEngine<C, L> {
    conn: C,
    input: L,
    state: EngineState,
}

impl<C: CommandExecutor, L: LineReader> CommandEngine<C, L> {
    pub fn new(conn: C, input: L) -> Self {
        Self {
            conn,
            input,
            state: EngineState::AwaitingInput,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Give the connection back, e.g. to return it to its pool
    pub fn into_connection(self) -> C {
        self.conn
    }

    /// Read and handle lines until `quit`/`exit` or end of input
    ///
    /// Replies go to `out`, command and script errors to `err`.
    pub fn run<O: Write, E: Write>(&mut self, out: &mut O, err: &mut E) -> io::Result<()> {
        while self.state == EngineState::AwaitingInput {
            match self.input.read_line(PROMPT)? {
                Some(line) => {
                    self.handle_line(&line, out, err)?;
                }
                None => {
                    debug!("End of input");
                    self.state = EngineState::Terminated;
                }
            }
        }
        Ok(())
    }

    /// Handle one line and return the resulting state
    pub fn handle_line<O: Write, E: Write>(
        &mut self,
        line: &str,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<EngineState> {
        match parse_line(line) {
            Dispatch::Skip => {}
            Dispatch::Quit => self.state = EngineState::Terminated,
            Dispatch::Eval(path) => {
                let result = match path {
                    Some(path) => run_script(&mut self.conn, Path::new(path)),
                    None => Err(ScriptError::MissingPath),
                };
                match result {
                    Ok(reply) => print_reply(&reply, out)?,
                    Err(e) => writeln!(err, "(error) {}", e)?,
                }
            }
            Dispatch::Command { name, args } => match self.conn.call(name, &args) {
                Ok(reply) => print_reply(&reply, out)?,
                Err(e) => writeln!(err, "(error) {}", e)?,
            },
        }
        Ok(self.state)
    }
}

fn print_reply<O: Write>(reply: &RespValue, out: &mut O) -> io::Result<()> {
    for line in render(reply) {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}
