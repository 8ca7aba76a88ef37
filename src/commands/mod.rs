//! Top-level subcommand orchestration.

pub mod build;
pub mod list;
