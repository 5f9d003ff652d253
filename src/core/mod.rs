// src/core/mod.rs

//! Task collection, persistence, operations, configuration and refresh.

pub mod collection;
pub mod config_loader;
pub mod operations;
pub mod paths;
pub mod refresher;
pub mod store;
