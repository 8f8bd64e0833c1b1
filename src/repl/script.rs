//! `eval <file>`: run a local Lua script on the server with zero keys

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::client::CommandExecutor;
use crate::utils::{RespValue, ScriptError};

/// Read the script at `path` and run it with `EVAL <body> 0`
pub fn run_script<C: CommandExecutor + ?Sized>(
    conn: &mut C,
    path: &Path,
) -> Result<RespValue, ScriptError> {
    let body = fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Running script {} ({} bytes)", path.display(), body.len());

    match conn.execute(&["EVAL", &body, "0"])? {
        RespValue::Error(e) => Err(ScriptError::Remote(e)),
        reply => Ok(reply),
    }
}
