// src/cli/handlers/add.rs

//! `add`.

use anyhow::Result;

use crate::cli::{
    dispatcher::{Context, Flow},
    handlers::commons,
};

/// `add "<Task name>"`
pub fn handle(args: &[String], ctx: &mut Context<'_>) -> Result<Flow> {
    let [name] = commons::expect_args::<1>("add", args)?;

    let outcome = ctx.store.lock().add(name)?;
    log::info!("Task added: {:?}", outcome);

    commons::print_outcome(ctx.out, &outcome)?;
    Ok(Flow::Continue)
}
