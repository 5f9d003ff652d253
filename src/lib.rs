//! # tasktrack
//!
//! A personal task tracker. Tasks live in a single JSON file that is read at session
//! start, rewritten after every mutation and, for long-lived sessions, periodically
//! reloaded in the background so external edits show up.
//!
//! - **`core`**: the task collection, its JSON store, the command operations and the
//!   background refresher.
//! - **`state`**: the lock-guarded store shared between the foreground and the refresher.
//! - **`cli`**: the dispatcher, the command handlers and the two session kinds.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod state;
