// src/cli/handlers/list.rs

//! The four listing commands. They print from a snapshot so the store lock is
//! not held while writing to the terminal.

use anyhow::Result;

use crate::{
    cli::{
        dispatcher::{Context, Flow},
        handlers::commons,
    },
    core::operations,
    models::TaskStatus,
};

/// `alltasks`
pub fn handle_all(_args: &[String], ctx: &mut Context<'_>) -> Result<Flow> {
    let tasks = ctx.store.snapshot();
    commons::print_tasks(ctx.out, operations::list_all(&tasks))?;
    Ok(Flow::Continue)
}

/// `donetasks`
pub fn handle_done(_args: &[String], ctx: &mut Context<'_>) -> Result<Flow> {
    print_filtered(ctx, TaskStatus::Done)
}

/// "Not done" means not started; in-progress tasks have their own listing.
pub fn handle_not_done(_args: &[String], ctx: &mut Context<'_>) -> Result<Flow> {
    print_filtered(ctx, TaskStatus::NotStarted)
}

/// `inprogresstasks`
pub fn handle_in_progress(_args: &[String], ctx: &mut Context<'_>) -> Result<Flow> {
    print_filtered(ctx, TaskStatus::InProgress)
}

fn print_filtered(ctx: &mut Context<'_>, status: TaskStatus) -> Result<Flow> {
    let tasks = ctx.store.snapshot();
    commons::print_tasks(ctx.out, operations::list_by_status(&tasks, status))?;
    Ok(Flow::Continue)
}
