//! Terminal line editing with history and command completion

use std::io;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};

use super::engine::LineReader;

/// Commands offered by tab completion
pub const COMMON_COMMANDS: &[&str] = &[
    "PING", "SET", "GET", "HGET", "HGETALL", "DEL", "EXISTS", "KEYS", "TTL", "INFO", "EVAL",
    "QUIT", "EXIT",
];

/// Commands starting with `prefix`, ignoring case
pub fn complete_word(prefix: &str) -> Vec<&'static str> {
    COMMON_COMMANDS
        .iter()
        .copied()
        .filter(|cmd| {
            cmd.len() >= prefix.len() && cmd[..prefix.len()].eq_ignore_ascii_case(prefix)
        })
        .collect()
}

/// Byte offset where the word ending at `pos` starts
fn word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .rfind(char::is_whitespace)
        .map(|i| i + line[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0)
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CommandCompleter;

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = word_start(line, pos);
        let candidates = complete_word(&line[start..pos])
            .into_iter()
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((start, candidates))
    }
}

/// Interactive terminal input backed by rustyline
pub struct Terminal {
    editor: Editor<CommandCompleter, DefaultHistory>,
}

impl Terminal {
    pub fn new() -> rustyline::Result<Self> {
        let mut editor: Editor<CommandCompleter, DefaultHistory> = Editor::new()?;
        editor.set_helper(Some(CommandCompleter));
        Ok(Self { editor })
    }
}

impl LineReader for Terminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str()).ok();
                }
                Ok(Some(line))
            }
            // Ctrl-C abandons the current line only
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_word_is_case_insensitive() {
        assert_eq!(complete_word("hg"), vec!["HGET", "HGETALL"]);
        assert_eq!(complete_word("PI"), vec!["PING"]);
        assert!(complete_word("zadd").is_empty());
    }

    #[test]
    fn test_empty_prefix_offers_everything() {
        assert_eq!(complete_word("").len(), COMMON_COMMANDS.len());
    }

    #[test]
    fn test_word_start() {
        assert_eq!(word_start("pi", 2), 0);
        assert_eq!(word_start("get key; ex", 11), 9);
        assert_eq!(word_start("get key ", 8), 8);
        // cursor in the middle of the line
        assert_eq!(word_start("hget h f", 4), 0);
        assert_eq!(word_start("a\u{3000}b", 4), 4);
    }
}
