// src/cli/handlers/update_status.rs

//! `updatestatus`.

use anyhow::Result;

use crate::cli::{
    dispatcher::{Context, Flow},
    handlers::commons,
};

/// `updatestatus <Task Index> <New Task Status>`
pub fn handle(args: &[String], ctx: &mut Context<'_>) -> Result<Flow> {
    let [index, status] = commons::expect_args::<2>("updatestatus", args)?;

    let outcome = ctx.store.lock().update_status(index, status)?;
    commons::print_outcome(ctx.out, &outcome)?;
    Ok(Flow::Continue)
}
