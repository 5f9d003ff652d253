// src/cli/handlers/mod.rs

//! One module per user command. Each handler receives its already counted
//! arguments and the session context.

pub mod add;
pub mod commons;
pub mod delete;
pub mod help;
pub mod list;
pub mod update;
pub mod update_status;
