// src/cli/handlers/delete.rs

//! `delete`.

use anyhow::Result;

use crate::cli::{
    dispatcher::{Context, Flow},
    handlers::commons,
};

/// `delete <Task Index>`
pub fn handle(args: &[String], ctx: &mut Context<'_>) -> Result<Flow> {
    let [index] = commons::expect_args::<1>("delete", args)?;

    let outcome = ctx.store.lock().delete(index)?;
    log::info!("Delete request for '{}': {:?}", index, outcome);

    commons::print_outcome(ctx.out, &outcome)?;
    Ok(Flow::Continue)
}
