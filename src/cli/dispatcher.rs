// src/cli/dispatcher.rs

//! The command registry and the router from a command line to its handler.

use anyhow::Result;
use std::io::Write;
use thiserror::Error;

use crate::{
    cli::handlers,
    core::operations::Argument,
    models::SessionMode,
    state::TaskStore,
};

// --- Dispatch Errors ---

/// Errors raised before a command reaches its handler.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// No command or alias has this name.
    #[error("an invalid command was entered")]
    UnknownCommand(String),
    /// The command was given the wrong number of arguments.
    #[error("incorrect number of arguments passed")]
    ArgumentCount {
        /// Canonical command name.
        command: &'static str,
        /// Arguments the command takes.
        expected: usize,
        /// Arguments that were passed.
        got: usize,
    },
}

// --- Handler Context ---

/// Everything a handler may touch: the shared store and the session's output.
pub struct Context<'a> {
    /// The shared task store.
    pub store: &'a TaskStore,
    /// Where command output goes.
    pub out: &'a mut dyn Write,
    /// The kind of session running the command.
    pub mode: SessionMode,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("store", self.store)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// What the session should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// End the session.
    Exit,
}

// --- Command Definition and Registry ---

/// A user command, the positional arguments it takes and its handler.
#[derive(Debug)]
pub struct CommandDefinition {
    /// Canonical, lowercase name.
    pub name: &'static str,
    /// Alternative names.
    pub aliases: &'static [&'static str],
    /// Positional arguments, in order.
    pub params: &'static [Argument],
    handler: fn(&[String], &mut Context<'_>) -> Result<Flow>,
}

impl CommandDefinition {
    /// Number of positional arguments the command expects.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// The single source of truth for all user commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "add",
        aliases: &[],
        params: &[Argument::Name],
        handler: handlers::add::handle,
    },
    CommandDefinition {
        name: "update",
        aliases: &[],
        params: &[Argument::Index, Argument::Name, Argument::Status],
        handler: handlers::update::handle,
    },
    CommandDefinition {
        name: "delete",
        aliases: &["del"],
        params: &[Argument::Index],
        handler: handlers::delete::handle,
    },
    CommandDefinition {
        name: "updatestatus",
        aliases: &[],
        params: &[Argument::Index, Argument::Status],
        handler: handlers::update_status::handle,
    },
    CommandDefinition {
        name: "alltasks",
        aliases: &["ls"],
        params: &[],
        handler: handlers::list::handle_all,
    },
    CommandDefinition {
        name: "donetasks",
        aliases: &[],
        params: &[],
        handler: handlers::list::handle_done,
    },
    CommandDefinition {
        name: "notdonetasks",
        aliases: &[],
        params: &[],
        handler: handlers::list::handle_not_done,
    },
    CommandDefinition {
        name: "inprogresstasks",
        aliases: &[],
        params: &[],
        handler: handlers::list::handle_in_progress,
    },
    CommandDefinition {
        name: "help",
        aliases: &[],
        params: &[],
        handler: handlers::help::handle,
    },
    CommandDefinition {
        name: "exit",
        aliases: &["quit"],
        params: &[],
        handler: handlers::help::handle_exit,
    },
];

/// Finds a command definition by name or alias, ignoring ASCII case.
pub fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY.iter().find(|cmd| {
        cmd.name.eq_ignore_ascii_case(name)
            || cmd.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    })
}

/// Like `find_command`, but an unknown name is an error.
pub fn resolve_command(name: &str) -> Result<&'static CommandDefinition, DispatchError> {
    find_command(name).ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))
}

/// Routes one tokenized command line (`[command, args...]`) to its handler.
///
/// The argument count is checked here, before anything reaches the store.
pub fn dispatch(tokens: &[String], ctx: &mut Context<'_>) -> Result<Flow> {
    log::debug!("Dispatching tokens: {:?}", tokens);

    let Some((name, args)) = tokens.split_first() else {
        return Ok(Flow::Continue);
    };
    let command = resolve_command(name)?;

    if args.len() != command.arity() {
        return Err(DispatchError::ArgumentCount {
            command: command.name,
            expected: command.arity(),
            got: args.len(),
        }
        .into());
    }

    (command.handler)(args, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::TaskFile;
    use tempfile::TempDir;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn open_store(dir: &TempDir) -> TaskStore {
        let file = TaskFile::new(dir.path().join("tasks.json"));
        file.ensure_exists().unwrap();
        TaskStore::open(file).unwrap()
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        assert_eq!(find_command("UpdateStatus").unwrap().name, "updatestatus");
        assert_eq!(find_command("ALLTASKS").unwrap().name, "alltasks");
        assert_eq!(find_command("Del").unwrap().name, "delete");
        assert!(find_command("frobnicate").is_none());
    }

    #[test]
    fn test_registry_arities() {
        let arity = |name: &str| find_command(name).unwrap().arity();
        assert_eq!(arity("add"), 1);
        assert_eq!(arity("update"), 3);
        assert_eq!(arity("delete"), 1);
        assert_eq!(arity("updatestatus"), 2);
        for list in ["alltasks", "donetasks", "notdonetasks", "inprogresstasks"] {
            assert_eq!(arity(list), 0);
        }
    }

    #[test]
    fn test_wrong_argument_count_never_reaches_the_store() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let mut out = Vec::new();
        let mut ctx = Context {
            store: &store,
            out: &mut out,
            mode: SessionMode::Interactive,
        };

        let err = dispatch(&tokens(&["add", "A", "B"]), &mut ctx).unwrap_err();

        assert_eq!(
            err.downcast_ref::<DispatchError>(),
            Some(&DispatchError::ArgumentCount {
                command: "add",
                expected: 1,
                got: 2
            })
        );
        assert_eq!(err.to_string(), "incorrect number of arguments passed");
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_unknown_command_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let mut out = Vec::new();
        let mut ctx = Context {
            store: &store,
            out: &mut out,
            mode: SessionMode::Interactive,
        };

        let err = dispatch(&tokens(&["launch"]), &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "an invalid command was entered");
    }

    #[test]
    fn test_exit_and_add_flow() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let mut out = Vec::new();
        let mut ctx = Context {
            store: &store,
            out: &mut out,
            mode: SessionMode::Interactive,
        };

        assert_eq!(dispatch(&tokens(&["Add", "Buy milk"]), &mut ctx).unwrap(), Flow::Continue);
        assert_eq!(dispatch(&tokens(&["EXIT"]), &mut ctx).unwrap(), Flow::Exit);
        assert_eq!(dispatch(&[], &mut ctx).unwrap(), Flow::Continue);
        assert_eq!(store.snapshot().len(), 1);
    }
}
