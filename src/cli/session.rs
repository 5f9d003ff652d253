// src/cli/session.rs

//! The two ways to drive tasktrack. Both are chosen once at startup behind the
//! `Session` trait: a read-eval-print loop, or a single command given through flags.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};
use std::time::Duration;
use tokio::runtime::Handle;

use crate::{
    cli::{
        Cli,
        dispatcher::{self, Context, Flow},
        handlers::commons,
        input::{LineReader, split_command_line},
    },
    core::{
        operations::Argument,
        refresher::{self, RefresherHandle},
    },
    models::{SessionMode, TaskTrackConfig},
    state::TaskStore,
};

/// A running tasktrack session.
pub trait Session {
    /// Runs the session to completion.
    fn handle(&mut self) -> Result<()>;

    /// Starts the background refresher on `runtime` if this session wants one.
    /// The refresher stops when the session is dropped.
    fn refresh(&mut self, runtime: &Handle);
}

/// Starts the refresher for `store` when an interval is configured.
fn start_refresher(
    store: &TaskStore,
    interval: Option<Duration>,
    runtime: &Handle,
) -> Option<RefresherHandle> {
    interval.map(|every| refresher::spawn(runtime, store.clone(), every))
}

// --- Interactive Session ---

/// The read-eval-print loop. Ends on `exit` or at end of input.
#[derive(Debug)]
pub struct InteractiveSession<W: Write> {
    store: TaskStore,
    input: LineReader,
    out: W,
    refresh_interval: Option<Duration>,
    refresher: Option<RefresherHandle>,
}

impl<W: Write> InteractiveSession<W> {
    /// A REPL over `input`, writing to `out`. Refreshes every `refresh_interval` if set.
    pub fn new(
        store: TaskStore,
        input: LineReader,
        out: W,
        refresh_interval: Option<Duration>,
    ) -> Self {
        Self {
            store,
            input,
            out,
            refresh_interval,
            refresher: None,
        }
    }
}

impl<W: Write> Session for InteractiveSession<W> {
    fn handle(&mut self) -> Result<()> {
        writeln!(self.out, "{}", t!("repl.started").bold())?;

        loop {
            let Some(line) = self.input.read_line(t!("repl.prompt"), &mut self.out)? else {
                log::debug!("End of input, leaving the session");
                writeln!(self.out)?;
                break;
            };

            let tokens = match split_command_line(&line) {
                Ok(tokens) => tokens,
                Err(e) => {
                    commons::print_error(&mut self.out, &e)?;
                    continue;
                }
            };
            if tokens.is_empty() {
                writeln!(self.out, "{}", t!("repl.empty_hint").dimmed())?;
                continue;
            }

            let mut ctx = Context {
                store: &self.store,
                out: &mut self.out,
                mode: SessionMode::Interactive,
            };
            match dispatcher::dispatch(&tokens, &mut ctx) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => {
                    log::debug!("Command {:?} failed: {:?}", tokens, e);
                    commons::print_error(&mut self.out, &e)?;
                }
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn refresh(&mut self, runtime: &Handle) {
        self.refresher = start_refresher(&self.store, self.refresh_interval, runtime);
    }
}

// --- One-shot Session ---

/// The flag values of a one-shot invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OneShotRequest {
    /// Value of `-c`.
    pub command: String,
    /// Value of `--index`.
    pub index: Option<String>,
    /// Value of `--name`.
    pub name: Option<String>,
    /// Value of `--status`.
    pub status: Option<String>,
}

impl OneShotRequest {
    /// Lays the flags out as a command line. An absent flag becomes an empty
    /// argument, which the operations report as missing.
    fn to_tokens(&self) -> Result<Vec<String>> {
        let command = dispatcher::resolve_command(self.command.trim())?;

        let mut tokens = Vec::with_capacity(command.arity() + 1);
        tokens.push(command.name.to_string());
        tokens.extend(command.params.iter().map(|param| {
            let value = match param {
                Argument::Index => &self.index,
                Argument::Name => &self.name,
                Argument::Status => &self.status,
            };
            value.clone().unwrap_or_default()
        }));
        Ok(tokens)
    }
}

/// Runs exactly one command; any error ends the process with a failure code.
#[derive(Debug)]
pub struct OneShotSession<W: Write> {
    store: TaskStore,
    request: OneShotRequest,
    out: W,
    refresh_interval: Option<Duration>,
    refresher: Option<RefresherHandle>,
}

impl<W: Write> OneShotSession<W> {
    /// A single run of `request`, writing to `out`.
    pub fn new(
        store: TaskStore,
        request: OneShotRequest,
        out: W,
        refresh_interval: Option<Duration>,
    ) -> Self {
        Self {
            store,
            request,
            out,
            refresh_interval,
            refresher: None,
        }
    }
}

impl<W: Write> Session for OneShotSession<W> {
    fn handle(&mut self) -> Result<()> {
        let tokens = self.request.to_tokens()?;
        let mut ctx = Context {
            store: &self.store,
            out: &mut self.out,
            mode: SessionMode::OneShot,
        };
        dispatcher::dispatch(&tokens, &mut ctx)?;
        self.out.flush()?;
        Ok(())
    }

    fn refresh(&mut self, runtime: &Handle) {
        self.refresher = start_refresher(&self.store, self.refresh_interval, runtime);
    }
}

/// Chooses the session kind from the parsed command line.
pub fn select_session(cli: &Cli, store: TaskStore, config: &TaskTrackConfig) -> Box<dyn Session> {
    let mode = cli.mode();
    let refresh_interval = config
        .refresh
        .enabled_for(mode)
        .then(|| config.refresh.interval());
    log::debug!(
        "Starting {:?} session (refresh: {:?})",
        mode,
        refresh_interval
    );

    match &cli.command {
        Some(command) => {
            let request = OneShotRequest {
                command: command.clone(),
                index: cli.index.clone(),
                name: cli.name.clone(),
                status: cli.status.clone(),
            };
            Box::new(OneShotSession::new(store, request, io::stdout(), refresh_interval))
        }
        None => Box::new(InteractiveSession::new(
            store,
            LineReader::stdin(),
            io::stdout(),
            refresh_interval,
        )),
    }
}
