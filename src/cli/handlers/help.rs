// src/cli/handlers/help.rs

//! `help` and `exit`.

use anyhow::Result;
use std::io::Write;

use crate::{
    cli::{
        dispatcher::{Context, Flow},
        render_markup,
    },
    models::SessionMode,
};

/// Prints the command reference for the current session kind.
pub fn handle(_args: &[String], ctx: &mut Context<'_>) -> Result<Flow> {
    let template = match ctx.mode {
        SessionMode::Interactive => t!("repl.help"),
        SessionMode::OneShot => t!("oneshot.help"),
    };
    writeln!(ctx.out, "{}", render_markup(template))?;
    Ok(Flow::Continue)
}

/// `exit`: ends an interactive session.
pub fn handle_exit(_args: &[String], _ctx: &mut Context<'_>) -> Result<Flow> {
    log::debug!("Exit requested");
    Ok(Flow::Exit)
}
