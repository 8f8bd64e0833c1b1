//! Numbered server menu shown after discovery

use std::io::{self, BufRead, Write};

use crate::discovery::ServerDescriptor;

/// 0-based index for a 1-based menu answer
///
/// Non-numeric input counts as 0, which like any out-of-range number selects
/// nothing.
pub fn selection_index(answer: &str, count: usize) -> Option<usize> {
    let choice: usize = answer.trim().parse().unwrap_or(0);
    (1..=count).contains(&choice).then(|| choice - 1)
}

/// Print the menu to `prompt`, read one answer from `input`
///
/// Returns `None` when the answer does not name a listed server.
pub fn choose_server<R: BufRead, W: Write>(
    mut servers: Vec<ServerDescriptor>,
    input: &mut R,
    prompt: &mut W,
) -> io::Result<Option<ServerDescriptor>> {
    writeln!(prompt, "Enter the server to connect to:")?;
    for (i, server) in servers.iter().enumerate() {
        writeln!(prompt, "{}) {}", i + 1, server)?;
    }
    prompt.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(selection_index(&answer, servers.len()).map(|i| servers.swap_remove(i)))
}
