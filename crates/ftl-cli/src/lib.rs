//! Flight time tracker CLI library.
//!
//! This crate provides the `ftl` command-line interface over the compliance
//! engine and its `SQLite` store.

mod cli;
pub mod commands;
mod config;

pub use cli::{AddArgs, Cli, Commands, EvaluateArgs};
pub use config::Config;
