//! CLI subcommand implementations.

pub mod add;
pub mod aircraft;
pub mod delete;
pub mod duty;
pub mod export;
pub mod fleet;
pub mod import;
pub mod pilot;
pub mod recompute;
pub mod rest;
pub mod status;
pub mod util;
