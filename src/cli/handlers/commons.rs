// src/cli/handlers/commons.rs

//! Output helpers shared by the handlers and the sessions.

use anyhow::Result;
use colored::Colorize;
use std::fmt::Display;
use std::io::Write;

use crate::{
    cli::dispatcher::DispatchError,
    core::operations::Outcome,
    models::{Task, TaskStatus},
};

/// Borrows the handler arguments as a fixed-size array.
pub fn expect_args<'a, const N: usize>(
    command: &'static str,
    args: &'a [String],
) -> Result<&'a [String; N], DispatchError> {
    <&[String; N]>::try_from(args).map_err(|_| DispatchError::ArgumentCount {
        command,
        expected: N,
        got: args.len(),
    })
}

/// One task per line, or the empty-list notice.
pub fn print_tasks<'a>(
    out: &mut dyn Write,
    tasks: impl IntoIterator<Item = &'a Task>,
) -> Result<()> {
    let mut printed = 0usize;
    for task in tasks {
        writeln!(out, "{}", format_task(task))?;
        printed += 1;
    }
    if printed == 0 {
        writeln!(out, "{}", t!("list.empty").dimmed())?;
    }
    Ok(())
}

/// `Index: N  Name: ...  Status: ...`, with the status colored.
pub fn format_task(task: &Task) -> String {
    let status = match task.status {
        TaskStatus::NotStarted => task.status.label().normal(),
        TaskStatus::InProgress => task.status.label().yellow(),
        TaskStatus::Done => task.status.label().green(),
    };
    format!(
        "{} {}  {} {}  {} {}",
        t!("task.label.index").bold(),
        task.index,
        t!("task.label.name").bold(),
        task.name,
        t!("task.label.status").bold(),
        status
    )
}

/// Prints the confirmation (or "not found") for an operation outcome.
pub fn print_outcome(out: &mut dyn Write, outcome: &Outcome) -> Result<()> {
    let message = if outcome.is_not_found() {
        outcome.message().yellow()
    } else {
        outcome.message().green()
    };
    writeln!(out, "{}", message)?;
    Ok(())
}

/// Errors inside the REPL are shown and the loop goes on.
pub fn print_error(out: &mut dyn Write, error: &dyn Display) -> Result<()> {
    writeln!(out, "{}: {}", t!("common.error").red().bold(), error)?;
    Ok(())
}
