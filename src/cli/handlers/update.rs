// src/cli/handlers/update.rs

//! `update`.

use anyhow::Result;

use crate::cli::{
    dispatcher::{Context, Flow},
    handlers::commons,
};

/// `update <Task Index> "<New Task Name>" <New Task Status>`
pub fn handle(args: &[String], ctx: &mut Context<'_>) -> Result<Flow> {
    let [index, name, status] = commons::expect_args::<3>("update", args)?;

    let outcome = ctx.store.lock().update(index, name, status)?;
    commons::print_outcome(ctx.out, &outcome)?;
    Ok(Flow::Continue)
}
