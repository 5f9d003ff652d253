// src/cli/input.rs

//! Reading and tokenizing interactive input.

use anyhow::Result;
use dialoguer::{Input, theme::ColorfulTheme};
use std::io::{self, BufRead, IsTerminal, Write};
use thiserror::Error;

/// A command line that cannot be split into words.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    /// A quote was opened and never closed.
    #[error("unbalanced quotes in input")]
    UnbalancedQuotes,
}

/// Splits a command line into words using shell quoting rules.
///
/// `add "Buy milk"` yields `["add", "Buy milk"]`.
pub fn split_command_line(line: &str) -> Result<Vec<String>, InputError> {
    shlex::split(line).ok_or(InputError::UnbalancedQuotes)
}

/// Whether a prompt failed because the user closed the input (Ctrl-D) or
/// interrupted it (Ctrl-C), rather than because of a real I/O fault.
fn is_end_of_input(err: &(dyn std::error::Error + 'static)) -> bool {
    let io_error = err
        .downcast_ref::<io::Error>()
        .or_else(|| err.source().and_then(|source| source.downcast_ref::<io::Error>()));
    io_error.is_some_and(|e| {
        matches!(
            e.kind(),
            io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted
        )
    })
}

/// Where the interactive session reads its lines from.
pub enum LineReader {
    /// A real terminal, driven through `dialoguer`.
    Terminal,
    /// Piped stdin or any other buffered source.
    Buffered(Box<dyn BufRead>),
}

impl std::fmt::Debug for LineReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminal => f.write_str("LineReader::Terminal"),
            Self::Buffered(_) => f.write_str("LineReader::Buffered"),
        }
    }
}

impl LineReader {
    /// Picks the terminal prompt when stdin is a TTY, plain line reads otherwise.
    pub fn stdin() -> Self {
        if io::stdin().is_terminal() {
            Self::Terminal
        } else {
            Self::Buffered(Box::new(io::BufReader::new(io::stdin())))
        }
    }

    /// Reads lines from any buffered source.
    pub fn from_reader(reader: impl BufRead + 'static) -> Self {
        Self::Buffered(Box::new(reader))
    }

    /// Prompts and reads one line without its line terminator. `None` means end of input.
    pub fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> Result<Option<String>> {
        match self {
            Self::Terminal => {
                let read: Result<String, dialoguer::Error> =
                    Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(prompt)
                        .allow_empty(true)
                        .interact_text();
                match read {
                    Ok(line) => Ok(Some(line)),
                    Err(e) if is_end_of_input(&e) => {
                        log::debug!("Terminal input closed: {}", e);
                        Ok(None)
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Self::Buffered(reader) => {
                write!(out, "{}: ", prompt)?;
                out.flush()?;

                let mut line = String::new();
                if reader.read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
            }
        }
    }
}
