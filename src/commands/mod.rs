//! Top-level subcommand orchestration.
pub mod deploy;
pub mod targets;
