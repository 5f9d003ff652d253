// src/bin/tasktrack.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::env;
use tasktrack::{
    cli::{Cli, session},
    core::{config_loader, store::TaskFile},
    state::TaskStore,
    t,
};

/// The main entry point of the `tasktrack` application.
/// It sets up logging, parses arguments, runs the selected session
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("{}: {:#}", t!("common.error").red().bold(), e);
        std::process::exit(1);
    }
}

/// Resolves configuration, prepares the tasks file and hands control to a session.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    // --- Configuration layers: file, environment, flags ---
    let cwd = env::current_dir().context("Could not determine the current directory")?;
    let mut config = config_loader::load_config(&cwd)?;
    config_loader::apply_env(&mut config, |name| env::var(name).ok())?;
    cli.apply_overrides(&mut config);
    config_loader::validate(&config)?;
    log::debug!("Effective config: {:?}", config);

    // --- Tasks file ---
    let file = TaskFile::new(config_loader::tasks_path(&config)?);
    if file.ensure_exists()? {
        println!(
            "{}",
            format!(t!("file.created"), path = file.path().display()).dimmed()
        );
    }
    let store = TaskStore::open(file)?;

    // --- Session ---
    // The foreground stays on this thread; the runtime only hosts the refresher.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("tasktrack-refresh")
        .enable_time()
        .build()
        .context("Failed to start the background runtime")?;

    let mut session = session::select_session(&cli, store, &config);
    session.refresh(runtime.handle());
    let result = session.handle();

    drop(session);
    runtime.shutdown_background();
    result
}
